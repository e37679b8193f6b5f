//! Conviction Trends - Aggravated Assault/Gun Trial Outcome Charts
//!
//! Downloads the public court-outcomes table and renders the yearly
//! conviction rate as observed, with the outlier trials removed, and with
//! the outlier cases counted as guilty.

mod charts;
mod config;
mod data;
mod report;
mod stats;

use anyhow::Context;
use config::ReportConfig;
use report::ReportRunner;

fn main() -> anyhow::Result<()> {
    pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cwd = std::env::current_dir().context("Failed to resolve working directory")?;
    let config = ReportConfig::discover(&cwd)?;

    let outcomes = ReportRunner::run(&config)
        .with_context(|| format!("Failed to load case outcomes from {}", config.source))?;

    let total = outcomes.len();
    let mut failed = 0;
    for (name, outcome) in outcomes {
        match outcome {
            Ok(output) => log::info!(
                "{name} ({}): chart {} / summary {}",
                output.report.title,
                output.chart_path.display(),
                output.summary_path.display()
            ),
            Err(e) => {
                log::error!("{name}: {e}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {total} chart variants failed");
    }
    Ok(())
}
