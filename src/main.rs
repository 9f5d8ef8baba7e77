use alarm_report::aggregator::EventAggregator;
use alarm_report::config::{OutputFormat, ReportConfig};
use alarm_report::report::{run_report, ReportKind};
use alarm_report::source::FileSource;
use anyhow::{bail, Context};
use clap::Parser;
use log::{error, info, warn};
use std::path::PathBuf;

/// Command-line arguments for the event-log report runner
#[derive(Parser)]
#[command(
    name = "alarm-report",
    about = "Aggregate reports over a monitoring-center event log",
    long_about = "Reads a CSV log of alarm, disarm and other security events and prints \
                  events per client, blended handling time per attendant, event types by \
                  frequency, and disarms that came long after their alarm."
)]
struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Configuration file path (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Event log to read, overriding the configured path
    #[arg(short, long, value_name = "CSV")]
    input: Option<PathBuf>,

    /// Output format, overriding the configured format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Reports to run (repeatable); all four when omitted
    #[arg(short, long = "report", value_enum)]
    reports: Vec<ReportKind>,

    /// Enable verbose logging
    #[arg(
        short,
        long,
        help = "Enable verbose logging output (sets RUST_LOG=debug)"
    )]
    verbose: bool,
}

impl Cli {
    /// Validate the CLI arguments
    fn validate(&self) -> Result<(), String> {
        if let Some(ref config_path) = self.config {
            if config_path.exists() && !config_path.is_file() {
                return Err(format!(
                    "Configuration path is not a file: {}",
                    config_path.display()
                ));
            }

            if let Some(extension) = config_path.extension() {
                if extension != "toml" {
                    warn!(
                        "Configuration file does not have .toml extension: {}",
                        config_path.display()
                    );
                }
            }
        }

        if let Some(ref input) = self.input {
            if input.is_dir() {
                return Err(format!("Input path is a directory: {}", input.display()));
            }
        }

        Ok(())
    }

    /// Merge command-line overrides into the loaded configuration
    fn apply(&self, mut config: ReportConfig) -> ReportConfig {
        if let Some(ref input) = self.input {
            config.source.path = input.clone();
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        config
    }

    fn selected_reports(&self) -> Vec<ReportKind> {
        if self.reports.is_empty() {
            ReportKind::ALL.to_vec()
        } else {
            self.reports.clone()
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    cli.validate().map_err(anyhow::Error::msg)?;

    let config = ReportConfig::load(cli.config.as_deref())
        .context("Failed to load configuration")?;
    let config = cli.apply(config);
    config.validate().context("Invalid configuration")?;

    let aggregator = EventAggregator::new(FileSource::new(&config.source.path))
        .with_early_disarm_threshold(config.thresholds.early_disarm());

    let mut failed = 0;
    for kind in cli.selected_reports() {
        match run_report(&aggregator, kind) {
            Ok(output) => {
                let rendered = output
                    .render(config.output.format)
                    .with_context(|| format!("Failed to render '{}'", kind.title()))?;
                println!("{}", rendered);
            }
            Err(e) => {
                error!("{} failed: {}", kind.title(), e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{} report(s) failed", failed);
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    if cli.verbose {
        std::env::set_var("RUST_LOG", "debug");
    }
    env_logger::init();

    info!("Starting event-log report");

    if let Err(e) = run(&cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }

    info!("Reports complete");
}
