use std::fs;
use std::path::{Path, PathBuf};

use tokio::sync::watch;

use crate::{Config, ConfigError};

/// Single owner of the config file.
///
/// Readers take immutable snapshots or subscribe to change notifications;
/// every accepted change is written back to disk as a whole.
pub struct ConfigStore {
    path: PathBuf,
    tx: watch::Sender<Config>,
}

impl ConfigStore {
    /// Missing or unreadable files fall back to defaults
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let config = match Self::read_file(&path) {
            Ok(config) => config,
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config at {}, using defaults", path.display());
                Config::default()
            }
            Err(e) => {
                tracing::warn!("Failed to load config {}: {e}", path.display());
                Config::default()
            }
        };

        Self::with_config(path, config)
    }

    pub fn with_config(path: impl Into<PathBuf>, config: Config) -> Self {
        let (tx, _rx) = watch::channel(config);
        Self {
            path: path.into(),
            tx,
        }
    }

    pub fn read_file(path: &Path) -> Result<Config, ConfigError> {
        let data = fs::read_to_string(path)?;
        let config = serde_json::from_str(&data)?;
        Ok(config)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn snapshot(&self) -> Config {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Config> {
        self.tx.subscribe()
    }

    /// Apply a change; subscribers are notified and the file rewritten only
    /// if the config actually changed. Returns whether it changed.
    pub fn update<F>(&self, f: F) -> Result<bool, ConfigError>
    where
        F: FnOnce(&mut Config),
    {
        let changed = self.tx.send_if_modified(|config| {
            let before = config.clone();
            f(config);
            *config != before
        });

        if changed {
            self.save()?;
        }
        Ok(changed)
    }

    /// Re-read the file, keeping the current config if it cannot be parsed
    pub fn reload(&self) -> Result<bool, ConfigError> {
        let fresh = Self::read_file(&self.path)?;
        let changed = self.tx.send_if_modified(|config| {
            if *config == fresh {
                false
            } else {
                *config = fresh;
                true
            }
        });
        Ok(changed)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(&*self.tx.borrow())?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, json)?;
        tracing::debug!("Config saved to {}", self.path.display());
        Ok(())
    }
}
