use std::env;
use std::time::Duration;

/// Voice endpoint settings. Not persisted; read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Host serving `/dictvoice`
    pub voice_host: String,
    pub voice_timeout_ms: u64,
    /// Pronunciation downloads allowed to run at once
    pub max_concurrent_fetches: usize,
}

impl NetworkConfig {
    pub fn new() -> Self {
        let voice_host = env::var("STUDYDESK_TTS_HOST")
            .unwrap_or_else(|_| "https://dict.youdao.com".to_string());

        let voice_timeout_ms = env::var("STUDYDESK_TTS_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5000); // 5 seconds default

        let max_concurrent_fetches = env::var("STUDYDESK_MAX_FETCHES")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|n: &usize| *n > 0)
            .unwrap_or(2);

        Self {
            voice_host: voice_host.trim_end_matches('/').to_string(),
            voice_timeout_ms,
            max_concurrent_fetches,
        }
    }

    pub fn voice_timeout(&self) -> Duration {
        Duration::from_millis(self.voice_timeout_ms)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::new()
    }
}
