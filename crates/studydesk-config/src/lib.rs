use serde::{Deserialize, Serialize};
use studydesk_types::{Accent, VisualSettings};

use self::hotkeys::HotkeyConfig;
use self::network::NetworkConfig;

pub mod error;
pub mod hotkeys;
pub mod network;
pub mod paths;
pub mod store;

pub use error::ConfigError;
pub use paths::Paths;
pub use store::ConfigStore;

fn default_topmost() -> bool {
    true
}

/// Persisted user settings, rewritten wholesale on every change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub pronunciation_type: Accent,
    pub shuffle_mode: bool,
    #[serde(default = "default_topmost")]
    pub topmost_enabled: bool,
    /// Dictionary file, relative to the assets directory or absolute
    pub current_dict: String,
    pub current_index: usize,
    pub visual_settings: VisualSettings,
    pub hotkeys: HotkeyConfig,

    /// Voice endpoint settings, taken from the environment
    #[serde(skip)]
    pub network: NetworkConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pronunciation_type: Accent::default(),
            shuffle_mode: false,
            topmost_enabled: default_topmost(),
            current_dict: String::new(),
            current_index: 0,
            visual_settings: VisualSettings::default(),
            hotkeys: HotkeyConfig::default(),
            network: NetworkConfig::default(),
        }
    }
}
