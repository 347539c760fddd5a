#[derive(Debug, thiserror::Error)]
pub enum PronounceError {
    #[error("Nothing to pronounce in '{0}'")]
    EmptyWord(String),

    #[error("Invalid voice endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Voice endpoint returned HTTP {0}")]
    Status(u16),

    #[error("Voice endpoint returned no audio")]
    EmptyBody,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Playback error: {0}")]
    Playback(String),
}
