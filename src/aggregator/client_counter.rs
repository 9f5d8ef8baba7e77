use crate::aggregator::Reducer;
use crate::error::ReportError;
use crate::events::EventRecord;
use std::collections::HashMap;

/// Counts events per client code
///
/// Every row adds exactly one to its client's count, whatever its type.
#[derive(Debug, Default)]
pub struct ClientEventCounter {
    counts: HashMap<String, u64>,
}

impl ClientEventCounter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reducer for ClientEventCounter {
    type Output = HashMap<String, u64>;

    fn name(&self) -> &'static str {
        "ClientEventCounter"
    }

    fn accept(&mut self, record: &EventRecord) -> Result<(), ReportError> {
        match self.counts.get_mut(&record.client_code) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(record.client_code.clone(), 1);
            }
        }
        Ok(())
    }

    fn finish(self) -> Self::Output {
        self.counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::reduce;
    use crate::events::EventType;

    fn record(client: &str, event_type: EventType) -> EventRecord {
        EventRecord {
            line: 1,
            sequential_code: "1".to_string(),
            client_code: client.to_string(),
            event_type,
            start_time: String::new(),
            end_time: String::new(),
            attendant_code: "A1".to_string(),
        }
    }

    #[test]
    fn test_counts_per_client() {
        let records = vec![
            record("C1", EventType::Alarm),
            record("C2", EventType::Disarm),
            record("C1", EventType::Test),
        ];
        let counts = reduce(ClientEventCounter::new(), &records).unwrap();

        let mut expected = HashMap::new();
        expected.insert("C1".to_string(), 2);
        expected.insert("C2".to_string(), 1);
        assert_eq!(counts, expected);
    }

    #[test]
    fn test_repeated_client_keeps_incrementing() {
        let records: Vec<_> = (0..5).map(|_| record("C7", EventType::Alarm)).collect();
        let counts = reduce(ClientEventCounter::new(), &records).unwrap();
        assert_eq!(counts.get("C7"), Some(&5));
    }

    #[test]
    fn test_empty_input() {
        let counts = reduce(ClientEventCounter::new(), &Vec::<EventRecord>::new()).unwrap();
        assert!(counts.is_empty());
    }
}
