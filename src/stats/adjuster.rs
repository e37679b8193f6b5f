//! Outlier Adjuster Module
//! Removes or reassigns a fixed number of cases for one year before rates are computed.

use super::{Aggregates, StatsError};
use crate::data::Disposition;
use serde::{Deserialize, Serialize};

/// Named adjustment applied to a chart variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentPolicy {
    /// Observed counts, untouched.
    None,
    /// Outlier cases drop out of the year's total.
    Remove,
    /// Outlier cases move from "Not Guilty/Acquittal" to "Guilty".
    Reassign,
}

impl AdjustmentPolicy {
    pub fn resolve(self, target_year: i32, outlier_case_count: u64) -> Option<Adjustment> {
        match self {
            AdjustmentPolicy::None => None,
            AdjustmentPolicy::Remove => Some(Adjustment {
                target_year,
                from: Disposition::NotGuiltyAcquittal,
                to: None,
                delta: outlier_case_count,
            }),
            AdjustmentPolicy::Reassign => Some(Adjustment {
                target_year,
                from: Disposition::NotGuiltyAcquittal,
                to: Some(Disposition::Guilty),
                delta: outlier_case_count,
            }),
        }
    }
}

/// Move `delta` cases out of `from` for `target_year`.
///
/// With `to == None` the cases vanish and the year's total shrinks; otherwise
/// they are credited to `to` and the total is preserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Adjustment {
    pub target_year: i32,
    pub from: Disposition,
    pub to: Option<Disposition>,
    pub delta: u64,
}

impl Adjustment {
    pub fn is_transfer(&self) -> bool {
        self.to.is_some()
    }
}

pub struct OutlierAdjuster;

impl OutlierAdjuster {
    pub fn apply(
        aggregates: &Aggregates,
        adjustment: Option<&Adjustment>,
    ) -> Result<Aggregates, StatsError> {
        let mut adjusted = aggregates.clone();
        let Some(adj) = adjustment else {
            return Ok(adjusted);
        };
        if adj.delta == 0 || adj.to == Some(adj.from) {
            return Ok(adjusted);
        }

        let year = adj.target_year;
        let count = aggregates.get(year, adj.from).unwrap_or(0);
        let remaining = count
            .checked_sub(adj.delta)
            .ok_or(StatsError::NegativeCount {
                year,
                disposition: adj.from,
                count,
                delta: adj.delta,
            })?;

        if let Some(to) = adj.to {
            let dest = aggregates
                .get(year, to)
                .ok_or(StatsError::IncompleteYear { year, missing: to })?;
            adjusted.set(year, to, dest + adj.delta);
        }
        adjusted.set(year, adj.from, remaining);

        log::debug!(
            "{} {year}: {} {count} -> {remaining}{}, year total {} -> {}",
            if adj.is_transfer() { "Transfer" } else { "Removal" },
            adj.from,
            adj.to
                .map(|to| format!(", {to} +{}", adj.delta))
                .unwrap_or_default(),
            aggregates.year_total(year),
            adjusted.year_total(year)
        );
        Ok(adjusted)
    }
}
