use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::errors::{JanitorError, Result};

/// Persistent janitor settings, read from `~/.nuget-janitor/config.toml`
/// or an explicit `--config` path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Directory the run log is written to (current directory when unset)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// File extension that identifies a package artifact
    #[serde(default = "default_artifact_extension")]
    pub artifact_extension: String,

    /// Output format preference
    #[serde(default)]
    pub output_format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
    Quiet,
}

fn default_artifact_extension() -> String {
    "nupkg".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_dir: None,
            artifact_extension: default_artifact_extension(),
            output_format: OutputFormat::Human,
        }
    }
}

impl Config {
    /// Get the janitor data directory (~/.nuget-janitor)
    pub fn data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".nuget-janitor")
    }

    /// Get the default config file path
    pub fn config_path() -> PathBuf {
        Self::data_dir().join("config.toml")
    }

    /// Load the default config file, or defaults if there is none
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load a specific config file. Unlike [`Config::load`], a missing
    /// file is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| JanitorError::Config {
            path: path.to_path_buf(),
            message: format!("Failed to read config: {}", e),
        })?;
        let config: Config = toml::from_str(&contents).map_err(|e| JanitorError::Config {
            path: path.to_path_buf(),
            message: format!("Failed to parse config: {}", e),
        })?;
        Ok(config)
    }

    /// Directory for the run log, falling back to the working directory
    pub fn resolved_log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}
