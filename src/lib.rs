/// Error types for record sources, reports, and configuration
pub mod error;

/// Event record shape and event types
pub mod events;

/// Line-oriented record sources
pub mod source;

/// The four event-log reports
pub mod aggregator;

/// Report selection and rendering
pub mod report;

/// Configuration management
pub mod config;

// Re-export commonly used types
pub use aggregator::EventAggregator;
pub use error::{ConfigError, ReportError};
pub use events::{EventRecord, EventType};
