use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a single report operation
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Record source not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("Failed to read record source: {0}")]
    SourceRead(#[from] std::io::Error),

    #[error("Malformed record on line {line}: {reason}")]
    RecordParse { line: u64, reason: String },
}

impl ReportError {
    /// Build a parse failure for the given 1-based line
    pub fn parse(line: u64, reason: impl Into<String>) -> Self {
        ReportError::RecordParse {
            line,
            reason: reason.into(),
        }
    }

    /// Convert a csv error, keeping I/O failures distinct from row failures
    pub(crate) fn from_csv(line: u64, err: csv::Error) -> Self {
        let reason = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(io) => ReportError::SourceRead(io),
            _ => ReportError::parse(line, reason),
        }
    }
}

/// Errors that can occur during configuration loading
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Invalid configuration value: {0}")]
    ValidationError(String),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}
