//! Alarm/disarm sequencing
//!
//! The checker keeps a single piece of state, the start time of the most
//! recent alarm. Disarms are compared against it; all other event types
//! pass through untouched. Input order is taken as chronological.

use crate::aggregator::Reducer;
use crate::error::ReportError;
use crate::events::{parse_timestamp, EventRecord, EventType};
use chrono::Duration;
use log::debug;

/// Last alarm seen, kept as raw text until a disarm needs it
#[derive(Debug, Clone)]
struct LastAlarm {
    line: u64,
    start_time: String,
}

/// Flags disarms that started more than `threshold` after the last alarm
#[derive(Debug)]
pub struct AlarmDisarmSequenceChecker {
    threshold: Duration,
    last_alarm: Option<LastAlarm>,
    flagged: Vec<i64>,
}

impl AlarmDisarmSequenceChecker {
    /// Five minutes
    pub const DEFAULT_THRESHOLD: Duration = Duration::milliseconds(300_000);

    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            last_alarm: None,
            flagged: Vec::new(),
        }
    }

    fn check_disarm(&mut self, record: &EventRecord) -> Result<(), ReportError> {
        let alarm = self.last_alarm.as_ref().ok_or_else(|| {
            ReportError::parse(record.line, "disarm without a preceding alarm")
        })?;
        let alarm_start = parse_timestamp(alarm.line, &alarm.start_time)?;
        let disarm_start = record.start_time()?;

        let gap = disarm_start - alarm_start;
        if gap > self.threshold {
            let code = record.sequential_code()?;
            debug!(
                "Disarm {} came {}s after alarm on line {}",
                code,
                gap.num_seconds(),
                alarm.line
            );
            self.flagged.push(code);
        }
        Ok(())
    }
}

impl Default for AlarmDisarmSequenceChecker {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD)
    }
}

impl Reducer for AlarmDisarmSequenceChecker {
    type Output = Vec<i64>;

    fn name(&self) -> &'static str {
        "AlarmDisarmSequenceChecker"
    }

    fn accept(&mut self, record: &EventRecord) -> Result<(), ReportError> {
        match record.event_type {
            EventType::Alarm => {
                self.last_alarm = Some(LastAlarm {
                    line: record.line,
                    start_time: record.start_time.clone(),
                });
                Ok(())
            }
            EventType::Disarm => self.check_disarm(record),
            _ => Ok(()),
        }
    }

    fn finish(self) -> Self::Output {
        self.flagged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::reduce;

    fn record(code: u64, event_type: EventType, start: &str) -> EventRecord {
        EventRecord {
            line: code,
            sequential_code: code.to_string(),
            client_code: "C1".to_string(),
            event_type,
            start_time: start.to_string(),
            end_time: start.to_string(),
            attendant_code: "A1".to_string(),
        }
    }

    fn check(records: &[EventRecord]) -> Result<Vec<i64>, ReportError> {
        reduce(AlarmDisarmSequenceChecker::default(), records)
    }

    #[test]
    fn test_disarm_ten_minutes_after_alarm_is_flagged() {
        let records = vec![
            record(1, EventType::Alarm, "2024-01-01 10:00:00"),
            record(2, EventType::Disarm, "2024-01-01 10:10:00"),
        ];
        assert_eq!(check(&records).unwrap(), vec![2]);
    }

    #[test]
    fn test_disarm_two_minutes_after_alarm_is_not_flagged() {
        let records = vec![
            record(1, EventType::Alarm, "2024-01-01 10:00:00"),
            record(2, EventType::Disarm, "2024-01-01 10:02:00"),
        ];
        assert!(check(&records).unwrap().is_empty());
    }

    #[test]
    fn test_exactly_five_minutes_is_not_flagged() {
        let records = vec![
            record(1, EventType::Alarm, "2024-01-01 10:00:00"),
            record(2, EventType::Disarm, "2024-01-01 10:05:00"),
            record(3, EventType::Disarm, "2024-01-01 10:05:01"),
        ];
        assert_eq!(check(&records).unwrap(), vec![3]);
    }

    #[test]
    fn test_compares_against_most_recent_alarm() {
        let records = vec![
            record(1, EventType::Alarm, "2024-01-01 10:00:00"),
            record(2, EventType::Alarm, "2024-01-01 10:08:00"),
            record(3, EventType::Disarm, "2024-01-01 10:10:00"),
        ];
        assert!(check(&records).unwrap().is_empty());
    }

    #[test]
    fn test_other_types_do_not_change_state() {
        let records = vec![
            record(1, EventType::Alarm, "2024-01-01 10:00:00"),
            record(2, EventType::Test, "2024-01-01 10:09:00"),
            record(3, EventType::Arm, "not a date"),
            record(4, EventType::Disarm, "2024-01-01 10:10:00"),
        ];
        assert_eq!(check(&records).unwrap(), vec![4]);
    }

    #[test]
    fn test_disarm_before_any_alarm_fails() {
        let records = vec![record(9, EventType::Disarm, "2024-01-01 10:10:00")];
        match check(&records) {
            Err(ReportError::RecordParse { line, reason }) => {
                assert_eq!(line, 9);
                assert!(reason.contains("preceding alarm"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_bad_alarm_time_fails_at_next_disarm() {
        let records = vec![
            record(1, EventType::Alarm, "10:00"),
            record(2, EventType::Disarm, "2024-01-01 10:10:00"),
        ];
        assert!(matches!(
            check(&records),
            Err(ReportError::RecordParse { line: 1, .. })
        ));
    }

    #[test]
    fn test_non_numeric_code_fails_only_when_flagged() {
        let mut early = record(2, EventType::Disarm, "2024-01-01 10:10:00");
        early.sequential_code = "two".to_string();
        let records = vec![record(1, EventType::Alarm, "2024-01-01 10:00:00"), early];
        assert!(check(&records).is_err());

        let mut late = record(2, EventType::Disarm, "2024-01-01 10:01:00");
        late.sequential_code = "two".to_string();
        let records = vec![record(1, EventType::Alarm, "2024-01-01 10:00:00"), late];
        assert!(check(&records).unwrap().is_empty());
    }
}

// Property-based tests
#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::aggregator::reduce;
    use crate::events::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use quickcheck::{Arbitrary, Gen};
    use quickcheck_macros::quickcheck;
    use std::collections::HashSet;

    /// Alarm followed by a mix of events, each offset in seconds from the previous
    #[derive(Debug, Clone)]
    struct EventSequence(Vec<(EventType, i64)>);

    impl Arbitrary for EventSequence {
        fn arbitrary(g: &mut Gen) -> Self {
            let choices = [
                EventType::Alarm,
                EventType::Arm,
                EventType::Disarm,
                EventType::Test,
            ];
            let size = usize::arbitrary(g) % 40;
            let mut events = vec![(EventType::Alarm, 0)];
            for _ in 0..size {
                let event_type = *g.choose(&choices).unwrap_or(&EventType::Test);
                let offset = (u16::arbitrary(g) % 900) as i64;
                events.push((event_type, offset));
            }
            EventSequence(events)
        }
    }

    fn build(sequence: &EventSequence) -> Vec<EventRecord> {
        let mut time =
            NaiveDateTime::parse_from_str("2024-01-01 00:00:00", TIMESTAMP_FORMAT).unwrap();
        sequence
            .0
            .iter()
            .enumerate()
            .map(|(i, (event_type, offset))| {
                time += Duration::seconds(*offset);
                let stamp = time.format(TIMESTAMP_FORMAT).to_string();
                EventRecord {
                    line: i as u64 + 1,
                    sequential_code: (i + 1).to_string(),
                    client_code: "C1".to_string(),
                    event_type: *event_type,
                    start_time: stamp.clone(),
                    end_time: stamp,
                    attendant_code: "A1".to_string(),
                }
            })
            .collect()
    }

    // Only disarm rows are ever reported
    #[quickcheck]
    fn prop_only_disarms_are_flagged(sequence: EventSequence) -> bool {
        let records = build(&sequence);
        let disarms: HashSet<i64> = records
            .iter()
            .filter(|r| r.event_type == EventType::Disarm)
            .map(|r| r.sequential_code().unwrap())
            .collect();
        let flagged = reduce(AlarmDisarmSequenceChecker::default(), &records).unwrap();
        flagged.iter().all(|code| disarms.contains(code))
    }

    // Nothing is flagged when every disarm is within the threshold of its alarm
    #[quickcheck]
    fn prop_prompt_disarms_are_never_flagged(sequence: EventSequence) -> bool {
        let prompt = EventSequence(
            sequence
                .0
                .iter()
                .map(|(t, offset)| match t {
                    // Keep every gap small enough that alarm-to-disarm never exceeds 5 minutes
                    EventType::Alarm | EventType::Disarm => (*t, offset % 7),
                    _ => (*t, 0),
                })
                .collect(),
        );
        // At most 40 gaps of at most 6 seconds each
        let records = build(&prompt);
        reduce(AlarmDisarmSequenceChecker::default(), &records)
            .unwrap()
            .is_empty()
    }
}
