use crate::aggregator::Reducer;
use crate::error::ReportError;
use crate::events::{EventRecord, EventType, TypeFrequency};
use std::collections::HashMap;

/// Ranks event types by how often they occur
///
/// Counts are kept in first-appearance order and sorted stably, so types
/// with equal counts stay in the order they first showed up in the log.
#[derive(Debug, Default)]
pub struct TypeFrequencyRanker {
    frequencies: Vec<TypeFrequency>,
    /// Position of each type in `frequencies`
    index: HashMap<EventType, usize>,
}

impl TypeFrequencyRanker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the ranker and return the counts, most frequent first
    pub fn into_frequencies(mut self) -> Vec<TypeFrequency> {
        self.frequencies.sort_by(|a, b| b.occurrences.cmp(&a.occurrences));
        self.frequencies
    }
}

impl Reducer for TypeFrequencyRanker {
    type Output = Vec<EventType>;

    fn name(&self) -> &'static str {
        "TypeFrequencyRanker"
    }

    fn accept(&mut self, record: &EventRecord) -> Result<(), ReportError> {
        match self.index.get(&record.event_type) {
            Some(&position) => self.frequencies[position].occurrences += 1,
            None => {
                self.index.insert(record.event_type, self.frequencies.len());
                self.frequencies.push(TypeFrequency {
                    event_type: record.event_type,
                    occurrences: 1,
                });
            }
        }
        Ok(())
    }

    fn finish(self) -> Self::Output {
        self.into_frequencies()
            .into_iter()
            .map(|frequency| frequency.event_type)
            .collect()
    }
}


// Property-based tests
#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::aggregator::reduce;
    use quickcheck::{Arbitrary, Gen};
    use quickcheck_macros::quickcheck;
    use std::collections::HashSet;

    #[derive(Debug, Clone)]
    struct TypeSequence(Vec<EventType>);

    impl Arbitrary for TypeSequence {
        fn arbitrary(g: &mut Gen) -> Self {
            let choices = [
                EventType::Alarm,
                EventType::Arm,
                EventType::Disarm,
                EventType::Test,
            ];
            let size = usize::arbitrary(g) % 60;
            let types = (0..size)
                .map(|_| *g.choose(&choices).unwrap_or(&EventType::Alarm))
                .collect();
            TypeSequence(types)
        }
    }

    fn count(types: &[EventType], wanted: EventType) -> usize {
        types.iter().filter(|t| **t == wanted).count()
    }

    // Output is a permutation of the distinct types, sorted by count
    #[quickcheck]
    fn prop_ranking_is_sorted_permutation(sequence: TypeSequence) -> bool {
        let input: Vec<EventRecord> = sequence
            .0
            .iter()
            .map(|t| EventRecord {
                line: 1,
                sequential_code: "1".to_string(),
                client_code: "C1".to_string(),
                event_type: *t,
                start_time: String::new(),
                end_time: String::new(),
                attendant_code: "A1".to_string(),
            })
            .collect();
        let ranked = reduce(TypeFrequencyRanker::new(), &input).unwrap();

        let distinct: HashSet<EventType> = sequence.0.iter().copied().collect();
        let ranked_set: HashSet<EventType> = ranked.iter().copied().collect();
        let is_permutation = ranked.len() == distinct.len() && ranked_set == distinct;

        let is_sorted = ranked
            .windows(2)
            .all(|pair| count(&sequence.0, pair[0]) >= count(&sequence.0, pair[1]));

        is_permutation && is_sorted
    }
}
