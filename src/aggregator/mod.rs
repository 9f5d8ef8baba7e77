/// Scan driver and the `Reducer` seam
pub mod event_aggregator;

/// Events per client
pub mod client_counter;

/// Blended handling time per attendant
pub mod attendant_timer;

/// Event types by descending frequency
pub mod type_ranker;

/// Disarms long after their alarm
pub mod disarm_checker;

pub use attendant_timer::AttendantAverageTimer;
pub use client_counter::ClientEventCounter;
pub use disarm_checker::AlarmDisarmSequenceChecker;
pub use event_aggregator::{reduce, EventAggregator, Reducer};
pub use type_ranker::TypeFrequencyRanker;
