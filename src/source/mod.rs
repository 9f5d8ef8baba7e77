/// Record sources and the CSV row reader
pub mod record_source;

pub use record_source::{FileSource, MemorySource, RecordReader, RecordSource};
