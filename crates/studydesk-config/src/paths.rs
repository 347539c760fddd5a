use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::ConfigError;

const APP_DIR: &str = "StudyDesk";

/// On-disk locations used by the app
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub config_file: PathBuf,
    pub review_file: PathBuf,
    /// Downloaded pronunciation audio
    pub cache_dir: PathBuf,
    /// Bundled dictionaries (`dicts/index.json` and the files it lists)
    pub assets_dir: PathBuf,
}

impl Paths {
    /// Resolve platform locations.
    ///
    /// `home` (or `STUDYDESK_HOME`) keeps every file under one directory;
    /// `assets` (or `STUDYDESK_ASSETS`) points at the dictionary bundle.
    pub fn resolve(home: Option<PathBuf>, assets: Option<PathBuf>) -> Self {
        let assets_dir = assets
            .or_else(|| env::var_os("STUDYDESK_ASSETS").map(PathBuf::from))
            .unwrap_or_else(default_assets_dir);

        let home = home.or_else(|| env::var_os("STUDYDESK_HOME").map(PathBuf::from));
        if let Some(home) = home {
            return Self::under(&home, assets_dir);
        }

        Self {
            config_file: app_dir(dirs::config_dir()).join("config.json"),
            review_file: app_dir(dirs::data_dir()).join("review.json"),
            cache_dir: app_dir(dirs::cache_dir()).join("voice"),
            assets_dir,
        }
    }

    /// Every file in one directory
    pub fn under(root: &Path, assets_dir: PathBuf) -> Self {
        Self {
            config_file: root.join("config.json"),
            review_file: root.join("review.json"),
            cache_dir: root.join("voice"),
            assets_dir,
        }
    }

    /// Create the parent folders and the audio cache directory if missing
    pub fn ensure_dirs(&self) -> Result<(), ConfigError> {
        for file in [&self.config_file, &self.review_file] {
            if let Some(parent) = file.parent() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::create_dir_all(&self.cache_dir)?;
        Ok(())
    }

    /// Dictionary path as stored in config: relative to the assets dir or absolute
    pub fn dictionary(&self, url: &str) -> PathBuf {
        self.assets_dir.join(url)
    }
}

/// Falls back to the temp dir when the platform has no such location
fn app_dir(base: Option<PathBuf>) -> PathBuf {
    base.unwrap_or_else(env::temp_dir).join(APP_DIR)
}

/// `assets/` next to the executable, otherwise in the working directory
fn default_assets_dir() -> PathBuf {
    let beside_exe = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("assets")));

    match beside_exe {
        Some(dir) if dir.is_dir() => dir,
        _ => PathBuf::from("assets"),
    }
}
