//! `ledgerlens-report`: load a JSON snapshot and render the dashboard report.
//!
//! Usage: `ledgerlens-report <snapshot.json> [period] [reference-rfc3339]`

use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};

use ledgerlens_core::Period;
use ledgerlens_infra::{Dashboard, DashboardReport, JsonFileSource, MetricsConfig, Snapshot};

pub const USAGE: &str = "usage: ledgerlens-report <snapshot.json> [period] [reference-rfc3339]";

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArgs {
    pub snapshot_path: PathBuf,
    /// `None` means the configured default period.
    pub period: Option<Period>,
    /// `None` means now.
    pub reference: Option<DateTime<Utc>>,
}

impl ReportArgs {
    /// Parse arguments (without the program name).
    pub fn parse<I>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let Some(snapshot_path) = args.next() else {
            bail!("missing snapshot path\n{USAGE}");
        };

        let period = args
            .next()
            .map(|token| token.parse::<Period>())
            .transpose()
            .context("invalid period argument")?;

        let reference = args
            .next()
            .map(|raw| {
                DateTime::parse_from_rfc3339(&raw)
                    .map(|dt| dt.with_timezone(&Utc))
                    .with_context(|| format!("invalid reference instant {raw:?}"))
            })
            .transpose()?;

        if let Some(extra) = args.next() {
            bail!("unexpected argument {extra:?}\n{USAGE}");
        }

        Ok(Self {
            snapshot_path: PathBuf::from(snapshot_path),
            period,
            reference,
        })
    }
}

/// Load the snapshot named by `args` and build its report.
pub fn run(args: &ReportArgs, config: MetricsConfig) -> anyhow::Result<DashboardReport> {
    let source = JsonFileSource::open(&args.snapshot_path)
        .with_context(|| format!("failed to open snapshot {}", args.snapshot_path.display()))?;
    let directory = source.directory();
    let snapshot = Snapshot::load(&source).context("failed to load snapshot")?;

    let dashboard = Dashboard::new(config);
    let period = args.period.unwrap_or(config.default_period);
    let reference = args.reference.unwrap_or_else(Utc::now);

    tracing::info!(%period, %reference, "building report");
    Ok(dashboard.build(&snapshot, period, reference, &directory))
}
