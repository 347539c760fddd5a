use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use studydesk_types::Accent;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use crate::normalize::{cache_key, normalize_word};
use crate::{AudioPlayer, PronunciationCache, VoiceFetcher};

type Pending = Arc<Mutex<HashSet<String>>>;

/// Fire-and-forget pronunciation requests.
///
/// At most `max_concurrent` downloads run at once, and a cache key that is
/// already being fetched is not queued a second time.
pub struct PronunciationQueue<F, P> {
    cache: Arc<PronunciationCache<F>>,
    player: Arc<P>,
    permits: Arc<Semaphore>,
    pending: Pending,
}

impl<F, P> Clone for PronunciationQueue<F, P> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            player: Arc::clone(&self.player),
            permits: Arc::clone(&self.permits),
            pending: Arc::clone(&self.pending),
        }
    }
}

impl<F, P> PronunciationQueue<F, P>
where
    F: VoiceFetcher + 'static,
    P: AudioPlayer,
{
    pub fn new(cache: PronunciationCache<F>, player: P, max_concurrent: usize) -> Self {
        Self {
            cache: Arc::new(cache),
            player: Arc::new(player),
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            pending: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn cache(&self) -> &PronunciationCache<F> {
        &self.cache
    }

    pub fn is_pending(&self, word: &str, accent: Accent) -> bool {
        let key = cache_key(&normalize_word(word), accent);
        lock(&self.pending).contains(&key)
    }

    /// Fetch (if needed) and play `word` in the background.
    ///
    /// Returns `None` when there is nothing to say or the same word is
    /// already in flight. Failures are logged by the task.
    pub fn enqueue(&self, word: &str, accent: Accent) -> Option<JoinHandle<()>> {
        let normalized = normalize_word(word);
        if normalized.is_empty() {
            tracing::debug!("Skipping pronunciation for '{word}'");
            return None;
        }

        let key = cache_key(&normalized, accent);
        let Some(claim) = PendingClaim::take(&self.pending, key) else {
            tracing::debug!("Pronunciation for '{normalized}' already in flight");
            return None;
        };

        let cache = Arc::clone(&self.cache);
        let player = Arc::clone(&self.player);
        let permits = Arc::clone(&self.permits);

        Some(tokio::spawn(async move {
            let fetched = {
                let Ok(_permit) = permits.acquire_owned().await else {
                    return;
                };
                let result = cache.get_audio(&normalized, accent).await;
                drop(claim);
                result
            };

            let path = match fetched {
                Ok(path) => path,
                Err(e) => {
                    tracing::warn!("No pronunciation for '{normalized}': {e}");
                    return;
                }
            };

            match tokio::task::spawn_blocking(move || player.play(&path)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::warn!("Playback failed: {e}"),
                Err(e) => tracing::error!("Playback task panicked: {e}"),
            }
        }))
    }
}

fn lock(pending: &Pending) -> std::sync::MutexGuard<'_, HashSet<String>> {
    pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Marks a cache key as in flight until dropped
struct PendingClaim {
    pending: Pending,
    key: String,
}

impl PendingClaim {
    fn take(pending: &Pending, key: String) -> Option<Self> {
        if !lock(pending).insert(key.clone()) {
            return None;
        }
        Some(Self {
            pending: Arc::clone(pending),
            key,
        })
    }
}

impl Drop for PendingClaim {
    fn drop(&mut self) {
        lock(&self.pending).remove(&self.key);
    }
}
