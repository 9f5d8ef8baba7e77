//! Core event types for the monitoring-center report
//!
//! This module defines the record shape read from the event log and the
//! small helper types produced while ranking event types.

use crate::error::ReportError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Timestamp type for event start and end times
pub type Timestamp = NaiveDateTime;

/// Layout of the timestamp columns in the event log
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Minimum number of comma-separated fields in a well-formed row
pub const MIN_FIELDS: usize = 7;

/// Kind of event raised by a monitored site
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventType {
    /// Security alert raised by the site
    Alarm,
    /// System armed
    Arm,
    /// Alert or system deactivated
    Disarm,
    /// Test signal
    Test,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Alarm => "ALARM",
            EventType::Arm => "ARM",
            EventType::Disarm => "DISARM",
            EventType::Test => "TEST",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = String;

    /// Exact, case-sensitive match. Older logs use the Portuguese tokens.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ALARM" | "ALARME" => Ok(EventType::Alarm),
            "ARM" | "ARME" => Ok(EventType::Arm),
            "DISARM" | "DESARME" => Ok(EventType::Disarm),
            "TEST" | "TESTE" => Ok(EventType::Test),
            other => Err(format!("unknown event type '{}'", other)),
        }
    }
}

/// One row of the event log
///
/// Column layout: 0 sequential code, 1 client code, 2 unused, 3 event type,
/// 4 start time, 5 end time, 6 attendant code. The sequential code and both
/// timestamps are kept as text and parsed on demand, so a report that never
/// reads a column cannot fail on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    /// 1-based line number in the source, used for error reporting
    pub line: u64,
    pub sequential_code: String,
    pub client_code: String,
    pub event_type: EventType,
    pub start_time: String,
    pub end_time: String,
    pub attendant_code: String,
}

impl EventRecord {
    /// Build a record from the split fields of one row
    ///
    /// # Errors
    ///
    /// Returns `ReportError::RecordParse` if the row has fewer than
    /// `MIN_FIELDS` fields or the type column is not a known `EventType`.
    pub fn from_fields<'a, I>(line: u64, fields: I) -> Result<Self, ReportError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let fields: Vec<&str> = fields.into_iter().collect();
        if fields.len() < MIN_FIELDS {
            return Err(ReportError::parse(
                line,
                format!(
                    "expected at least {} fields, found {}",
                    MIN_FIELDS,
                    fields.len()
                ),
            ));
        }

        let event_type = fields[3]
            .parse::<EventType>()
            .map_err(|reason| ReportError::parse(line, reason))?;

        Ok(Self {
            line,
            sequential_code: fields[0].to_string(),
            client_code: fields[1].to_string(),
            event_type,
            start_time: fields[4].to_string(),
            end_time: fields[5].to_string(),
            attendant_code: fields[6].to_string(),
        })
    }

    /// Sequential code as a signed integer; negative codes are accepted
    pub fn sequential_code(&self) -> Result<i64, ReportError> {
        self.sequential_code.parse::<i64>().map_err(|e| {
            ReportError::parse(
                self.line,
                format!("invalid sequential code '{}': {}", self.sequential_code, e),
            )
        })
    }

    pub fn start_time(&self) -> Result<Timestamp, ReportError> {
        parse_timestamp(self.line, &self.start_time)
    }

    pub fn end_time(&self) -> Result<Timestamp, ReportError> {
        parse_timestamp(self.line, &self.end_time)
    }
}

/// Parse a `yyyy-MM-dd HH:mm:ss` timestamp
pub fn parse_timestamp(line: u64, value: &str) -> Result<Timestamp, ReportError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|e| {
        ReportError::parse(line, format!("invalid timestamp '{}': {}", value, e))
    })
}

/// Occurrence count of one event type, used while ranking
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TypeFrequency {
    pub event_type: EventType,
    pub occurrences: u64,
}
