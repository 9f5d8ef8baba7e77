/// TOML configuration for the report runner
pub mod report_config;

pub use report_config::{OutputConfig, OutputFormat, ReportConfig, SourceConfig, ThresholdConfig};
