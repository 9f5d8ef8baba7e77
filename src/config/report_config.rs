use crate::error::ConfigError;
use chrono::Duration;
use clap::ValueEnum;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Report runner configuration (loaded from a TOML file)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub thresholds: ThresholdConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Event log to read
    #[serde(default = "default_source_path")]
    pub path: PathBuf,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: default_source_path(),
        }
    }
}

fn default_source_path() -> PathBuf {
    PathBuf::from("relatorio.csv")
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ThresholdConfig {
    /// Alarm-to-disarm gap above which a disarm is reported
    #[serde(default = "default_early_disarm_ms")]
    pub early_disarm_ms: i64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            early_disarm_ms: default_early_disarm_ms(),
        }
    }
}

fn default_early_disarm_ms() -> i64 {
    300_000
}

impl ThresholdConfig {
    pub fn early_disarm(&self) -> Duration {
        Duration::milliseconds(self.early_disarm_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl ReportConfig {
    /// Parse and validate configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ReportConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadError` if the file cannot be read, and a
    /// parse or validation error if its contents are invalid.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from an optional path
    ///
    /// A missing or unreadable file falls back to defaults with a warning;
    /// a file that exists but is invalid is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                info!("Loading configuration from: {}", path.display());
                match Self::from_file(path) {
                    Err(ConfigError::ReadError(reason)) => {
                        warn!("Configuration unreadable ({}), using defaults", reason);
                        Ok(Self::default())
                    }
                    other => other,
                }
            }
            None => {
                info!("Using default configuration");
                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "source.path must not be empty".to_string(),
            ));
        }
        if self.thresholds.early_disarm_ms < 0 {
            return Err(ConfigError::ValidationError(format!(
                "thresholds.early_disarm_ms must not be negative, got {}",
                self.thresholds.early_disarm_ms
            )));
        }
        Ok(())
    }
}
