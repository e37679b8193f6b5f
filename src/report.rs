//! Report Module
//! Runs the load → aggregate → adjust → rate → chart pipeline for every
//! configured chart variant and writes the outputs.

use crate::charts::{ChartData, RenderError, StaticChartRenderer};
use crate::config::{ReportConfig, VariantConfig};
use crate::data::{
    DataLoader, DataProcessor, Disposition, LoaderError, ProcessorError, YearRange,
    YearRateRecord,
};
use crate::stats::{
    Adjustment, AdjustmentPolicy, Aggregates, Aggregator, OutlierAdjuster, RateCalculator,
    RateTable, StatsError,
};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error(transparent)]
    Processor(#[from] ProcessorError),
    #[error(transparent)]
    Stats(#[from] StatsError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to serialize summary: {0}")]
    Json(#[from] serde_json::Error),
}

/// Machine-readable result of one variant, written next to its chart.
#[derive(Debug, Clone, Serialize)]
pub struct VariantReport {
    pub name: String,
    pub title: String,
    pub policy: AdjustmentPolicy,
    pub adjustment: Option<Adjustment>,
    pub totals: BTreeMap<i32, u64>,
    pub rates: Vec<YearRateRecord>,
}

/// Paths written for a successful variant.
#[derive(Debug, Clone)]
pub struct VariantOutput {
    pub report: VariantReport,
    pub chart_path: PathBuf,
    pub summary_path: PathBuf,
}

pub struct ReportRunner;

impl ReportRunner {
    /// Fetch, filter and aggregate the source table once.
    pub fn load_aggregates(config: &ReportConfig) -> Result<Aggregates, ReportError> {
        let df = DataLoader::new().load(&config.source)?;
        let aggregates = Self::aggregate_frame(&df, config)?;
        if aggregates.is_empty() {
            log::warn!("No in-scope records found in {}", config.source);
        }
        Ok(aggregates)
    }

    pub fn aggregate_frame(
        df: &polars::prelude::DataFrame,
        config: &ReportConfig,
    ) -> Result<Aggregates, ReportError> {
        let columns = DataLoader::resolve_columns(df, &config.columns)?;
        let years = YearRange {
            start: config.year_start,
            cutoff: config.year_cutoff,
        };
        let records = DataProcessor::normalize(df, &columns, &config.labels, years)?;
        Ok(Aggregator::aggregate(&records))
    }

    /// Adjust and compute rates for one variant without touching the filesystem.
    pub fn compute_variant(
        config: &ReportConfig,
        aggregates: &Aggregates,
        variant: &VariantConfig,
    ) -> Result<(VariantReport, RateTable), ReportError> {
        let adjustment = config.adjustment_for(variant.policy);
        let adjusted = OutlierAdjuster::apply(aggregates, adjustment.as_ref())?;
        let rates = RateCalculator::compute(&adjusted)?;

        let report = VariantReport {
            name: variant.name.clone(),
            title: variant.title.clone(),
            policy: variant.policy,
            adjustment,
            totals: rates.totals().clone(),
            rates: rates.to_records(),
        };
        Ok((report, rates))
    }

    /// Compute one variant and write its PNG chart and JSON summary.
    pub fn run_variant(
        config: &ReportConfig,
        aggregates: &Aggregates,
        variant: &VariantConfig,
    ) -> Result<VariantOutput, ReportError> {
        let (report, rates) = Self::compute_variant(config, aggregates, variant)?;
        Self::log_rates(&report.name, &rates);

        let chart_path = config.output_dir.join(format!("{}.png", variant.name));
        let summary_path = config.output_dir.join(format!("{}.json", variant.name));

        let chart = ChartData::from_rates(&variant.title, &rates, &config.labels);
        StaticChartRenderer::render_png(&chart, &config.chart, &chart_path)?;
        write_file(&summary_path, &serde_json::to_vec_pretty(&report)?)?;

        Ok(VariantOutput {
            report,
            chart_path,
            summary_path,
        })
    }

    /// Run every configured variant in parallel over the shared aggregates.
    ///
    /// Load failures abort everything; a failing variant only fails itself.
    pub fn run(
        config: &ReportConfig,
    ) -> Result<Vec<(String, Result<VariantOutput, ReportError>)>, ReportError> {
        let aggregates = Self::load_aggregates(config)?;
        Self::run_with(config, &aggregates)
    }

    pub fn run_with(
        config: &ReportConfig,
        aggregates: &Aggregates,
    ) -> Result<Vec<(String, Result<VariantOutput, ReportError>)>, ReportError> {
        std::fs::create_dir_all(&config.output_dir).map_err(|source| ReportError::Io {
            path: config.output_dir.clone(),
            source,
        })?;

        Ok(config
            .variants
            .par_iter()
            .map(|variant| {
                (
                    variant.name.clone(),
                    Self::run_variant(config, aggregates, variant),
                )
            })
            .collect())
    }

    fn log_rates(name: &str, rates: &RateTable) {
        for (&year, total) in rates.totals() {
            let cells: Vec<String> = Disposition::ALL
                .iter()
                .filter_map(|&d| rates.percent(year, d).map(|pct| format!("{d} {pct:.2}%")))
                .collect();
            log::info!("[{name}] {year} (n={total}): {}", cells.join(", "));
        }
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), ReportError> {
    std::fs::write(path, bytes).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
