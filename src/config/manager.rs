//! Config manager for loading and saving settings.
//!
//! Key behaviors:
//! - Load-or-create: a missing file is created with defaults
//! - Corruption fallback: an unparsable file is renamed to `.bak` and
//!   regenerated from defaults
//! - Atomic writes (write to temp file, then rename)

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::settings::Settings;

/// Errors that can occur during config operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Result type for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Manages persistent application settings.
///
/// The settings file is JSON; the manager is constructed once at
/// startup and passed to the callers that need a snapshot.
pub struct ConfigManager {
    config_path: PathBuf,
    settings: Settings,
}

impl ConfigManager {
    /// Create a manager for the given config file path.
    ///
    /// Does not load the config; call `load_or_create()` after.
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            settings: Settings::default(),
        }
    }

    /// Default config file location (`~/.config/subburn/config.json`,
    /// or `$APPDATA/subburn/config.json` on Windows).
    pub fn default_path() -> PathBuf {
        let base = if cfg!(windows) {
            std::env::var_os("APPDATA")
                .map(PathBuf::from)
                .or_else(home_dir)
        } else {
            home_dir().map(|h| h.join(".config"))
        };
        base.unwrap_or_else(|| PathBuf::from("."))
            .join("subburn")
            .join("config.json")
    }

    /// Get the config file path.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Get a reference to the current settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Get a mutable reference to the current settings.
    ///
    /// Changes are in memory only until `save()` is called.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Load the config, creating it with defaults if missing.
    ///
    /// A corrupt file is renamed to `<name>.bak` and replaced by a
    /// fresh default config.
    pub fn load_or_create(&mut self) -> ConfigResult<()> {
        if self.config_path.exists() {
            let content = fs::read_to_string(&self.config_path)?;
            match serde_json::from_str(&content) {
                Ok(settings) => {
                    self.settings = settings;
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(
                        path = %self.config_path.display(),
                        error = %e,
                        "config corrupt, backing up and regenerating"
                    );
                    let backup = self.config_path.with_extension("bak");
                    fs::rename(&self.config_path, backup)?;
                }
            }
        }

        self.settings = Settings::default();
        self.save()
    }

    /// Save the config atomically.
    ///
    /// Writes to a temp file first, then renames over the target.
    pub fn save(&self) -> ConfigResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&self.settings)?;
        let tmp_path = self.config_path.with_extension("json.tmp");
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &self.config_path)?;
        Ok(())
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_default_config_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut manager = ConfigManager::new(&path);
        manager.load_or_create().unwrap();

        assert!(path.exists());
        assert_eq!(manager.settings().encode.crf, 23);
    }

    #[test]
    fn loads_saved_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut manager = ConfigManager::new(&path);
        manager.load_or_create().unwrap();
        manager.settings_mut().encode.crf = 18;
        manager.settings_mut().font.bold = true;
        manager.save().unwrap();

        let mut reloaded = ConfigManager::new(&path);
        reloaded.load_or_create().unwrap();
        assert_eq!(reloaded.settings().encode.crf, 18);
        assert!(reloaded.settings().font.bold);
    }

    #[test]
    fn corrupt_config_is_backed_up_and_regenerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ this is not json").unwrap();

        let mut manager = ConfigManager::new(&path);
        manager.load_or_create().unwrap();

        assert_eq!(manager.settings().encode.crf, 23);
        assert!(dir.path().join("config.bak").exists());
        // Regenerated file parses cleanly
        let content = fs::read_to_string(&path).unwrap();
        assert!(serde_json::from_str::<Settings>(&content).is_ok());
    }
}
