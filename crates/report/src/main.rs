use anyhow::Context;

use ledgerlens_infra::MetricsConfig;
use ledgerlens_report::{run, ReportArgs};

fn main() -> anyhow::Result<()> {
    ledgerlens_observability::init();

    let config = MetricsConfig::from_env().context("invalid configuration")?;
    let args = ReportArgs::parse(std::env::args().skip(1))?;

    let report = run(&args, config)?;
    if report.skipped.total() > 0 {
        tracing::warn!(skipped = report.skipped.total(), "report built from a partial snapshot");
    }

    let rendered = serde_json::to_string_pretty(&report).context("failed to render report")?;
    println!("{rendered}");
    Ok(())
}
