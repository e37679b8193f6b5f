//! Domain Model Module
//! Record and key types shared by every pipeline stage.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trial outcome categories the report distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Disposition {
    Guilty,
    NotGuiltyAcquittal,
}

impl Disposition {
    pub const ALL: [Disposition; 2] = [Disposition::Guilty, Disposition::NotGuiltyAcquittal];
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Disposition::Guilty => write!(f, "Guilty"),
            Disposition::NotGuiltyAcquittal => write!(f, "Not Guilty/Acquittal"),
        }
    }
}

/// One in-scope row of the source table after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseOutcomeRecord {
    pub date: NaiveDate,
    pub disposition: Disposition,
    pub count: u64,
}

impl CaseOutcomeRecord {
    /// Calendar year the record falls into.
    pub fn year(&self) -> i32 {
        self.date.year()
    }
}

/// A single (year, disposition, percent) row, the long form handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearRateRecord {
    pub year: i32,
    pub disposition: Disposition,
    pub percent: f64,
}
