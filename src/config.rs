//! Configuration for the supply store and logging
//!
//! Values are layered:
//! 1. Defaults in code
//! 2. An optional TOML file (`config/supply.toml` unless a path is given)
//! 3. Environment variables with the `SUPPLY` prefix, e.g. `SUPPLY__STORAGE__PATH`

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct SupplyConfig {
    pub storage: StorageConfig,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct StorageConfig {
    /// Directory of the sled database
    pub path: PathBuf,

    /// Open a throwaway database that is removed on drop
    pub temporary: bool,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,

    /// Emit JSON lines instead of the human readable format
    pub json: bool,
}

impl SupplyConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    pub fn load_from(file: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match file {
            Some(path) => File::from(path).required(true),
            None => File::with_name("config/supply").required(false),
        };

        config::Config::builder()
            .set_default("storage.path", "data/supply")?
            .set_default("storage.temporary", false)?
            .set_default("log.filter", "info")?
            .set_default("log.json", false)?
            .add_source(file)
            .add_source(
                Environment::with_prefix("SUPPLY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/supply"),
            temporary: false,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("supply.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[storage]\npath = \"/var/lib/supply\"\n\n[log]\njson = true").unwrap();

        let config = SupplyConfig::load_from(Some(&path)).unwrap();

        assert_eq!(config.storage.path, PathBuf::from("/var/lib/supply"));
        assert!(!config.storage.temporary);
        assert!(config.log.json);
        assert_eq!(config.log.filter, "info");
    }

    #[test]
    fn missing_required_file_fails() {
        let dir = tempfile::tempdir().unwrap();

        assert!(SupplyConfig::load_from(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
