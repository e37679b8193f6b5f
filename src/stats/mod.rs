//! Stats module - aggregation, outlier adjustment and rate calculation

mod adjuster;
mod aggregator;
mod calculator;

pub use adjuster::{Adjustment, AdjustmentPolicy, OutlierAdjuster};
pub use aggregator::{Aggregates, Aggregator};
pub use calculator::{RateCalculator, RateTable};

use crate::data::Disposition;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    #[error("Year {year} has no '{missing}' cases; both dispositions are required")]
    IncompleteYear { year: i32, missing: Disposition },
    #[error(
        "Removing {delta} '{disposition}' cases from {year} would leave a negative count (have {count})"
    )]
    NegativeCount {
        year: i32,
        disposition: Disposition,
        count: u64,
        delta: u64,
    },
    #[error("Year {year} has zero cases across both dispositions")]
    DivisionByZero { year: i32 },
}
