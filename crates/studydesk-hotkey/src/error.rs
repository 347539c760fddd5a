#[derive(Debug, thiserror::Error)]
pub enum HotkeyError {
    #[error("Failed to create hotkey manager: {0}")]
    Manager(#[source] global_hotkey::Error),

    #[error("Failed to register '{keys}': {source}")]
    Register {
        keys: String,
        #[source]
        source: global_hotkey::Error,
    },

    #[error("Unknown key: {0}")]
    UnknownKey(String),

    #[error("No key in combination: {0}")]
    MissingKey(String),

    #[error("More than one key in combination: {0}")]
    MultipleKeys(String),

    #[error("Failed to spawn listener thread: {0}")]
    Spawn(#[from] std::io::Error),
}
