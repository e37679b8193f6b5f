//! Data Processor Module
//! Restricts the source table to the in-scope dispositions and years and
//! turns the remaining rows into typed records.

use super::loader::ResolvedColumns;
use super::model::CaseOutcomeRecord;
use crate::config::DispositionLabels;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Row {row}: unparseable date '{value}' in column '{column}'")]
    InvalidDate {
        row: usize,
        column: String,
        value: String,
    },
    #[error("Row {row}: invalid case count '{value}' in column '{column}'")]
    InvalidCount {
        row: usize,
        column: String,
        value: String,
    },
}

/// 1-based source row number carried through filtering for error context.
const ROW_COLUMN: &str = "__row";

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

/// Year bounds applied after dates are parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub start: Option<i32>,
    pub cutoff: i32,
}

impl YearRange {
    pub fn contains(&self, year: i32) -> bool {
        year <= self.cutoff && self.start.map_or(true, |start| year >= start)
    }
}

/// Handles filtering and normalization of the raw table.
pub struct DataProcessor;

impl DataProcessor {
    /// Keep only the two configured disposition labels.
    pub fn filter_dispositions(
        df: &DataFrame,
        columns: &ResolvedColumns,
        labels: &DispositionLabels,
    ) -> Result<DataFrame, ProcessorError> {
        let dispo = col(columns.disposition.as_str());
        let filtered = df
            .clone()
            .with_row_index(ROW_COLUMN.into(), Some(1))?
            .lazy()
            .select([
                col(ROW_COLUMN).cast(DataType::UInt64),
                col(columns.date.as_str()),
                col(columns.disposition.as_str()),
                col(columns.count.as_str()),
            ])
            .filter(
                dispo
                    .clone()
                    .eq(lit(labels.guilty.as_str()))
                    .or(dispo.eq(lit(labels.not_guilty.as_str()))),
            )
            .collect()?;
        Ok(filtered)
    }

    /// Filter the raw table and convert it into validated records within `years`.
    ///
    /// Any unparseable date or count among the retained rows aborts the whole run.
    pub fn normalize(
        df: &DataFrame,
        columns: &ResolvedColumns,
        labels: &DispositionLabels,
        years: YearRange,
    ) -> Result<Vec<CaseOutcomeRecord>, ProcessorError> {
        let filtered = Self::filter_dispositions(df, columns, labels)?;

        let rows = filtered
            .column(ROW_COLUMN)?
            .as_materialized_series()
            .u64()?;
        let dates = filtered
            .column(&columns.date)?
            .as_materialized_series()
            .str()?;
        let dispositions = filtered
            .column(&columns.disposition)?
            .as_materialized_series()
            .str()?;
        let counts = filtered
            .column(&columns.count)?
            .as_materialized_series()
            .str()?;

        let mut records = Vec::with_capacity(filtered.height());
        for (((row, date), dispo), count) in rows
            .into_iter()
            .zip(dates)
            .zip(dispositions)
            .zip(counts)
        {
            let row = row.unwrap_or_default() as usize;
            let Some(disposition) = dispo.and_then(|d| labels.classify(d)) else {
                continue;
            };

            let date_text = date.unwrap_or_default();
            let date = parse_date(date_text).ok_or_else(|| ProcessorError::InvalidDate {
                row,
                column: columns.date.clone(),
                value: date_text.to_string(),
            })?;
            if !years.contains(date.year()) {
                continue;
            }

            let count_text = count.unwrap_or_default();
            let count = parse_count(count_text).ok_or_else(|| ProcessorError::InvalidCount {
                row,
                column: columns.count.clone(),
                value: count_text.to_string(),
            })?;

            records.push(CaseOutcomeRecord {
                date,
                disposition,
                count,
            });
        }

        log::info!(
            "Kept {} of {} rows ({} in scope by disposition)",
            records.len(),
            df.height(),
            filtered.height()
        );
        Ok(records)
    }
}

/// Parse the date formats the source has been observed to use.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Parse a non-negative whole count; integral floats such as "3.0" are accepted.
pub fn parse_count(s: &str) -> Option<u64> {
    let s = s.trim();
    if let Ok(n) = s.parse::<u64>() {
        return Some(n);
    }
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}
