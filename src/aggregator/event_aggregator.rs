//! Event aggregator over a record source
//!
//! This module provides the EventAggregator, which runs each report as its
//! own single pass over a freshly opened record source, and the `Reducer`
//! trait every report implements.

use crate::aggregator::{
    AlarmDisarmSequenceChecker, AttendantAverageTimer, ClientEventCounter, TypeFrequencyRanker,
};
use crate::error::ReportError;
use crate::events::{EventRecord, EventType};
use crate::source::RecordSource;
use chrono::Duration;
use log::{info, warn};
use std::collections::HashMap;

/// Single-pass accumulator over event records
///
/// A reducer is created fresh for every scan, fed each record in file
/// order, and consumed by `finish` to produce the report.
pub trait Reducer {
    type Output;

    /// Get a human-readable name for this report
    fn name(&self) -> &'static str;

    /// Fold one record into the accumulated state
    fn accept(&mut self, record: &EventRecord) -> Result<(), ReportError>;

    /// Consume the accumulated state and produce the report
    fn finish(self) -> Self::Output;
}

/// Run a reducer over records already held in memory
pub fn reduce<'a, R, I>(mut reducer: R, records: I) -> Result<R::Output, ReportError>
where
    R: Reducer,
    I: IntoIterator<Item = &'a EventRecord>,
{
    for record in records {
        reducer.accept(record)?;
    }
    Ok(reducer.finish())
}

/// Entry point for the four event-log reports
///
/// Holds only the record source and settings. Every query opens the source,
/// scans it once with a fresh reducer, and releases it before returning, so
/// calls never share state and repeated calls on a static log agree.
pub struct EventAggregator<S: RecordSource> {
    source: S,
    /// Minimum gap between an alarm and its disarm for the disarm to be flagged
    early_disarm_threshold: Duration,
}

impl<S: RecordSource> EventAggregator<S> {
    /// Create an aggregator with the default five minute disarm threshold
    ///
    /// # Examples
    ///
    /// ```
    /// use alarm_report::aggregator::EventAggregator;
    /// use alarm_report::source::MemorySource;
    ///
    /// let source = MemorySource::from_lines([
    ///     "1,C1,,ALARM,2024-01-01 10:00:00,2024-01-01 10:00:00,A1",
    ///     "2,C1,,DISARM,2024-01-01 10:10:00,2024-01-01 10:10:00,A1",
    /// ]);
    /// let aggregator = EventAggregator::new(source);
    /// assert_eq!(aggregator.find_early_disarms().unwrap(), vec![2]);
    /// ```
    pub fn new(source: S) -> Self {
        Self {
            source,
            early_disarm_threshold: AlarmDisarmSequenceChecker::DEFAULT_THRESHOLD,
        }
    }

    pub fn with_early_disarm_threshold(mut self, threshold: Duration) -> Self {
        self.early_disarm_threshold = threshold;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Scan the source once with the given reducer
    ///
    /// # Errors
    ///
    /// Any open, read, or parse failure aborts the scan. The partially
    /// accumulated state is dropped along with the reader.
    pub fn run<R: Reducer>(&self, mut reducer: R) -> Result<R::Output, ReportError> {
        let name = reducer.name();
        info!("Running {} over {}", name, self.source.describe());

        let mut records = self.source.records()?;
        for record in records.by_ref() {
            let accepted = record.and_then(|record| reducer.accept(&record));
            if let Err(e) = accepted {
                warn!("{} aborted: {}", name, e);
                return Err(e);
            }
        }

        info!("{} finished after {} rows", name, records.rows_read());
        Ok(reducer.finish())
    }

    /// Number of events per client code
    pub fn count_events_by_client(&self) -> Result<HashMap<String, u64>, ReportError> {
        self.run(ClientEventCounter::new())
    }

    /// Blended handling time per attendant code
    pub fn average_duration_by_attendant(&self) -> Result<HashMap<String, i64>, ReportError> {
        self.run(AttendantAverageTimer::new())
    }

    /// Event types present in the log, most frequent first
    pub fn rank_types_by_frequency_descending(&self) -> Result<Vec<EventType>, ReportError> {
        self.run(TypeFrequencyRanker::new())
    }

    /// Sequential codes of disarms that came more than the threshold after the last alarm
    pub fn find_early_disarms(&self) -> Result<Vec<i64>, ReportError> {
        self.run(AlarmDisarmSequenceChecker::new(self.early_disarm_threshold))
    }
}
