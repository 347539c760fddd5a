use std::path::{Path, PathBuf};

use studydesk_types::Accent;

use crate::normalize::{cache_key, normalize_word};
use crate::{PronounceError, VoiceFetcher};

pub const AUDIO_EXTENSION: &str = "mp3";

/// On-disk pronunciation cache.
///
/// Files are never expired or evicted: once `<word>_<type>.mp3` exists it is
/// served as is.
pub struct PronunciationCache<F> {
    dir: PathBuf,
    fetcher: F,
}

impl<F: VoiceFetcher> PronunciationCache<F> {
    /// Creates the cache directory if it is missing
    pub fn new(dir: impl Into<PathBuf>, fetcher: F) -> Result<Self, PronounceError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir, fetcher })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// File path for an already normalized word
    pub fn path_for(&self, normalized: &str, accent: Accent) -> PathBuf {
        self.dir
            .join(format!("{}.{AUDIO_EXTENSION}", cache_key(normalized, accent)))
    }

    /// Cached file for `word`, without fetching
    pub fn cached(&self, word: &str, accent: Accent) -> Option<PathBuf> {
        let normalized = normalize_word(word);
        if normalized.is_empty() {
            return None;
        }
        let path = self.path_for(&normalized, accent);
        path.is_file().then_some(path)
    }

    /// Local audio for `word`, downloading it on first use.
    ///
    /// A failed download leaves no file behind.
    pub async fn get_audio(&self, word: &str, accent: Accent) -> Result<PathBuf, PronounceError> {
        let normalized = normalize_word(word);
        if normalized.is_empty() {
            return Err(PronounceError::EmptyWord(word.to_string()));
        }

        let path = self.path_for(&normalized, accent);
        if tokio::fs::try_exists(&path).await? {
            tracing::debug!("Pronunciation cache hit: {}", path.display());
            return Ok(path);
        }

        let audio = self.fetcher.fetch(&normalized, accent).await?;

        // Write beside the target and rename so a partial file is never served
        let partial = path.with_extension(format!("{AUDIO_EXTENSION}.part"));
        if let Err(e) = write_then_rename(&partial, &path, &audio).await {
            tokio::fs::remove_file(&partial).await.ok();
            return Err(e.into());
        }

        tracing::info!("Cached pronunciation for '{normalized}' ({})", accent.label());
        Ok(path)
    }
}

async fn write_then_rename(partial: &Path, path: &Path, audio: &[u8]) -> std::io::Result<()> {
    tokio::fs::write(partial, audio).await?;
    tokio::fs::rename(partial, path).await
}
