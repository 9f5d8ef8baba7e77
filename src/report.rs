//! Report selection and rendering
//!
//! The aggregator returns plain maps and lists; this module turns them into
//! something a person or another tool can read. Map keys are sorted so the
//! output is stable between runs.

use crate::aggregator::EventAggregator;
use crate::config::OutputFormat;
use crate::error::ReportError;
use crate::events::EventType;
use crate::source::RecordSource;
use clap::ValueEnum;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// One of the four event-log reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    Clients,
    Attendants,
    Types,
    EarlyDisarms,
}

impl ReportKind {
    pub const ALL: [ReportKind; 4] = [
        ReportKind::Clients,
        ReportKind::Attendants,
        ReportKind::Types,
        ReportKind::EarlyDisarms,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::Clients => "Events per client",
            ReportKind::Attendants => "Average handling time per attendant",
            ReportKind::Types => "Event types by frequency",
            ReportKind::EarlyDisarms => "Disarms more than the threshold after their alarm",
        }
    }
}

/// Result of one report, ready to render
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "report", content = "result", rename_all = "snake_case")]
pub enum ReportOutput {
    Clients(BTreeMap<String, u64>),
    Attendants(BTreeMap<String, i64>),
    Types(Vec<EventType>),
    EarlyDisarms(Vec<i64>),
}

fn sorted<V>(map: HashMap<String, V>) -> BTreeMap<String, V> {
    map.into_iter().collect()
}

/// Run one report against the aggregator's source
pub fn run_report<S: RecordSource>(
    aggregator: &EventAggregator<S>,
    kind: ReportKind,
) -> Result<ReportOutput, ReportError> {
    Ok(match kind {
        ReportKind::Clients => ReportOutput::Clients(sorted(aggregator.count_events_by_client()?)),
        ReportKind::Attendants => {
            ReportOutput::Attendants(sorted(aggregator.average_duration_by_attendant()?))
        }
        ReportKind::Types => ReportOutput::Types(aggregator.rank_types_by_frequency_descending()?),
        ReportKind::EarlyDisarms => ReportOutput::EarlyDisarms(aggregator.find_early_disarms()?),
    })
}

impl ReportOutput {
    pub fn kind(&self) -> ReportKind {
        match self {
            ReportOutput::Clients(_) => ReportKind::Clients,
            ReportOutput::Attendants(_) => ReportKind::Attendants,
            ReportOutput::Types(_) => ReportKind::Types,
            ReportOutput::EarlyDisarms(_) => ReportKind::EarlyDisarms,
        }
    }

    /// Render as a titled plain-text listing
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn render(&self, format: OutputFormat) -> Result<String, serde_json::Error> {
        match format {
            OutputFormat::Text => Ok(self.to_text()),
            OutputFormat::Json => self.to_json(),
        }
    }
}

impl fmt::Display for ReportOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.kind().title())?;
        match self {
            ReportOutput::Clients(counts) => {
                for (client, count) in counts {
                    writeln!(f, "  {:<12} {}", client, count)?;
                }
            }
            ReportOutput::Attendants(averages) => {
                for (attendant, average) in averages {
                    writeln!(f, "  {:<12} {}", attendant, average)?;
                }
            }
            ReportOutput::Types(types) => {
                for (rank, event_type) in types.iter().enumerate() {
                    writeln!(f, "  {}. {}", rank + 1, event_type)?;
                }
            }
            ReportOutput::EarlyDisarms(codes) => {
                for code in codes {
                    writeln!(f, "  {}", code)?;
                }
            }
        }
        Ok(())
    }
}
