//! Persisted commute configuration.
//!
//! Stores the origin/destination pair as JSON at `~/.config/commute.json`
//! so the addresses only have to be typed once.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Could not determine home directory")]
    NoHomeDir,
}

/// The saved commute endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommuteConfig {
    pub origin: String,
    pub destination: String,
}

/// Path of the persisted config file.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let home = std::env::var_os("HOME").ok_or(ConfigError::NoHomeDir)?;
    Ok(PathBuf::from(home).join(".config").join("commute.json"))
}

impl CommuteConfig {
    /// Load the saved config, if any.
    ///
    /// Any failure (missing file, bad JSON, no home dir) reads as "no
    /// saved config"; the caller falls back to usage guidance.
    pub fn load() -> Option<Self> {
        let path = config_path().ok()?;
        match Self::load_from(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                debug!("No usable config at {:?}: {}", path, e);
                None
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Persist to the default config path, creating `.config` if needed.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".config").join("commute.json");

        let config = CommuteConfig {
            origin: "1234 Culver Drive, Irvine, CA 92602".to_string(),
            destination: "4077 Ince Blvd, Culver City, CA 90232".to_string(),
        };
        config.save_to(&path).unwrap();

        let loaded = CommuteConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_errors() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("commute.json");

        assert!(CommuteConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_load_malformed_json_errors() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("commute.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            CommuteConfig::load_from(&path),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("commute.json");

        let config = CommuteConfig {
            origin: "A".to_string(),
            destination: "B".to_string(),
        };
        config.save_to(&path).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_config_is_pretty_json() {
        let config = CommuteConfig {
            origin: "A".to_string(),
            destination: "B".to_string(),
        };
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("commute.json");
        config.save_to(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\n"));
        assert!(raw.contains("\"origin\": \"A\""));
    }
}
