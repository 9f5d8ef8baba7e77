//! Line-oriented record sources
//!
//! A `RecordSource` hands out a fresh reader for every scan. The reader is
//! owned by the scan and dropped when it ends, on success or failure.

use crate::error::ReportError;
use crate::events::EventRecord;
use log::debug;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Provider of raw event-log bytes
pub trait RecordSource {
    /// Open a new reader positioned at the first row
    fn open(&self) -> Result<Box<dyn Read + '_>, ReportError>;

    /// Human-readable description for logging
    fn describe(&self) -> String;

    /// Open the source and wrap it in a `RecordReader`
    fn records(&self) -> Result<RecordReader<Box<dyn Read + '_>>, ReportError> {
        Ok(RecordReader::new(self.open()?))
    }
}

/// Event log stored on disk
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for FileSource {
    fn open(&self) -> Result<Box<dyn Read + '_>, ReportError> {
        debug!("Opening event log {}", self.path.display());
        match File::open(&self.path) {
            Ok(file) => Ok(Box::new(file)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(ReportError::SourceNotFound {
                path: self.path.clone(),
            }),
            Err(e) => Err(ReportError::SourceRead(e)),
        }
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Event log held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    contents: String,
}

impl MemorySource {
    pub fn new(contents: impl Into<String>) -> Self {
        Self {
            contents: contents.into(),
        }
    }

    /// Build a source from individual rows, one per line
    pub fn from_lines<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        let mut contents = String::new();
        for line in lines {
            contents.push_str(line.as_ref());
            contents.push('\n');
        }
        Self { contents }
    }
}

impl RecordSource for MemorySource {
    fn open(&self) -> Result<Box<dyn Read + '_>, ReportError> {
        Ok(Box::new(self.contents.as_bytes()))
    }

    fn describe(&self) -> String {
        format!("in-memory log ({} bytes)", self.contents.len())
    }
}

/// Iterator of parsed rows over a CSV reader
///
/// There is no header row; the first line is data. Quotes are ordinary
/// characters, so every physical line is exactly one row. Rows may have any
/// number of fields, shape checks happen in `EventRecord::from_fields`.
pub struct RecordReader<R: Read> {
    reader: csv::Reader<R>,
    row: csv::StringRecord,
    line: u64,
    done: bool,
}

impl<R: Read> RecordReader<R> {
    pub fn new(inner: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .trim(csv::Trim::None)
            .from_reader(inner);
        Self {
            reader,
            row: csv::StringRecord::new(),
            line: 0,
            done: false,
        }
    }

    /// Number of rows read so far
    pub fn rows_read(&self) -> u64 {
        self.line
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<EventRecord, ReportError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.reader.read_record(&mut self.row) {
            Ok(true) => {
                self.line = self.row.position().map_or(self.line + 1, |p| p.line());
                Some(EventRecord::from_fields(self.line, self.row.iter()))
            }
            Ok(false) => {
                self.done = true;
                None
            }
            Err(e) => {
                // A failed read leaves the reader in an unknown position
                self.done = true;
                Some(Err(ReportError::from_csv(self.line + 1, e)))
            }
        }
    }
}
