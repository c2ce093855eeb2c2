//! Configuration management for the neurofe CLI

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{CliError, CliResult};

/// Global CLI configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Default logging filter when `RUST_LOG` is unset
    pub log_level: Option<String>,

    /// Directory for elaborated listings written without `-o`
    pub run_dir: PathBuf,

    /// Write `&` placement records when generating networks
    pub save_mappings: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            run_dir: PathBuf::from("runs"),
            save_mappings: false,
        }
    }
}

impl CliConfig {
    /// Load configuration from file; a missing file yields defaults
    pub fn load_from_file(path: &Path) -> CliResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content).map_err(|e| CliError::config(format!("Invalid config file: {}", e)))
        } else {
            Ok(Self::default())
        }
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> CliResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CliError::config("Could not determine config directory"))?;
        Ok(config_dir.join("neurofe").join("config.toml"))
    }

    /// Load from `path`, or from the default location when none is given
    pub fn resolve(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(p) => Self::load_from_file(p),
            None => match Self::default_config_path() {
                Ok(p) => Self::load_from_file(&p),
                Err(_) => Ok(Self::default()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let cfg = CliConfig::load_from_file(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg, CliConfig::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "save_mappings = true\n").unwrap();
        let cfg = CliConfig::load_from_file(&path).unwrap();
        assert!(cfg.save_mappings);
        assert_eq!(cfg.run_dir, PathBuf::from("runs"));
    }

    #[test]
    fn bad_file_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "save_mappings = \"yes\"\n").unwrap();
        assert!(matches!(CliConfig::load_from_file(&path), Err(CliError::Config(_))));
    }
}
