//! Running handling time per attendant
//!
//! The stored value is not an arithmetic mean. Each row's duration is
//! blended half and half with the value stored so far, starting from zero:
//! `stored = (stored + duration) / 2`. Durations are the start time minus
//! the end time in milliseconds, divided by the milliseconds in a day.
//! Both divisions truncate toward zero.

use crate::aggregator::Reducer;
use crate::error::ReportError;
use crate::events::EventRecord;
use std::collections::HashMap;

/// Divisor applied to the raw millisecond difference
pub const MILLIS_PER_DAY: i64 = 86_400_000;

#[derive(Debug, Default)]
pub struct AttendantAverageTimer {
    averages: HashMap<String, i64>,
}

impl AttendantAverageTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Duration of one record in the report's unit
    pub fn duration(record: &EventRecord) -> Result<i64, ReportError> {
        let start = record.start_time()?;
        let end = record.end_time()?;
        Ok((start - end).num_milliseconds() / MILLIS_PER_DAY)
    }
}

impl Reducer for AttendantAverageTimer {
    type Output = HashMap<String, i64>;

    fn name(&self) -> &'static str {
        "AttendantAverageTimer"
    }

    fn accept(&mut self, record: &EventRecord) -> Result<(), ReportError> {
        let duration = Self::duration(record)?;
        let stored = self
            .averages
            .entry(record.attendant_code.clone())
            .or_insert(0);
        *stored = (*stored + duration) / 2;
        Ok(())
    }

    fn finish(self) -> Self::Output {
        self.averages
    }
}
