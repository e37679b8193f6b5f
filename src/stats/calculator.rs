//! Rate Calculator Module
//! Converts (possibly adjusted) aggregates into per-year percentages.

use super::{Aggregates, StatsError};
use crate::data::{Disposition, YearRateRecord};
use std::collections::BTreeMap;

/// Percent of the year's total per (year, disposition), plus the totals used.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateTable {
    percents: BTreeMap<(i32, Disposition), f64>,
    totals: BTreeMap<i32, u64>,
}

impl RateTable {
    pub fn percent(&self, year: i32, disposition: Disposition) -> Option<f64> {
        self.percents.get(&(year, disposition)).copied()
    }

    pub fn totals(&self) -> &BTreeMap<i32, u64> {
        &self.totals
    }

    /// Long-form rows ordered by year, then disposition.
    pub fn to_records(&self) -> Vec<YearRateRecord> {
        self.percents
            .iter()
            .map(|(&(year, disposition), &percent)| YearRateRecord {
                year,
                disposition,
                percent,
            })
            .collect()
    }
}

pub struct RateCalculator;

impl RateCalculator {
    /// Every year must carry both dispositions and a non-zero total.
    pub fn compute(aggregates: &Aggregates) -> Result<RateTable, StatsError> {
        let mut table = RateTable::default();

        for year in aggregates.years() {
            let guilty = Self::required(aggregates, year, Disposition::Guilty)?;
            let not_guilty = Self::required(aggregates, year, Disposition::NotGuiltyAcquittal)?;

            let total = guilty + not_guilty;
            if total == 0 {
                return Err(StatsError::DivisionByZero { year });
            }

            table.totals.insert(year, total);
            for (disposition, count) in [
                (Disposition::Guilty, guilty),
                (Disposition::NotGuiltyAcquittal, not_guilty),
            ] {
                table
                    .percents
                    .insert((year, disposition), round2(count as f64 / total as f64 * 100.0));
            }
        }

        Ok(table)
    }

    fn required(
        aggregates: &Aggregates,
        year: i32,
        disposition: Disposition,
    ) -> Result<u64, StatsError> {
        aggregates
            .get(year, disposition)
            .ok_or(StatsError::IncompleteYear {
                year,
                missing: disposition,
            })
    }
}

/// Round half away from zero to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{AdjustmentPolicy, OutlierAdjuster};
    use proptest::prelude::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn example_2019() -> Aggregates {
        [
            (2019, Disposition::Guilty, 200),
            (2019, Disposition::NotGuiltyAcquittal, 50),
        ]
        .into_iter()
        .collect()
    }

    fn rates_for(policy: AdjustmentPolicy) -> RateTable {
        let adj = policy.resolve(2019, 36);
        let adjusted = OutlierAdjuster::apply(&example_2019(), adj.as_ref()).unwrap();
        RateCalculator::compute(&adjusted).unwrap()
    }

    #[test]
    fn observed_rates() {
        let rates = rates_for(AdjustmentPolicy::None);
        assert!(close(rates.percent(2019, Disposition::Guilty).unwrap(), 80.0));
        assert!(close(
            rates.percent(2019, Disposition::NotGuiltyAcquittal).unwrap(),
            20.0
        ));
        assert_eq!(rates.totals().get(&2019).copied(), Some(250));
    }

    #[test]
    fn removed_outliers_shrink_denominator() {
        let rates = rates_for(AdjustmentPolicy::Remove);
        assert!(close(rates.percent(2019, Disposition::Guilty).unwrap(), 93.46));
        assert!(close(
            rates.percent(2019, Disposition::NotGuiltyAcquittal).unwrap(),
            6.54
        ));
        assert_eq!(rates.totals().get(&2019).copied(), Some(214));
    }

    #[test]
    fn reassigned_outliers_keep_denominator() {
        let rates = rates_for(AdjustmentPolicy::Reassign);
        assert!(close(rates.percent(2019, Disposition::Guilty).unwrap(), 94.4));
        assert!(close(
            rates.percent(2019, Disposition::NotGuiltyAcquittal).unwrap(),
            5.6
        ));
        assert_eq!(rates.totals().get(&2019).copied(), Some(250));
    }

    #[test]
    fn single_disposition_year_is_incomplete() {
        let aggregates: Aggregates = [
            (2018, Disposition::Guilty, 10),
            (2018, Disposition::NotGuiltyAcquittal, 5),
            (2019, Disposition::Guilty, 12),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            RateCalculator::compute(&aggregates).unwrap_err(),
            StatsError::IncompleteYear {
                year: 2019,
                missing: Disposition::NotGuiltyAcquittal,
            }
        );
    }

    #[test]
    fn zero_total_is_division_by_zero() {
        let aggregates: Aggregates = [
            (2016, Disposition::Guilty, 0),
            (2016, Disposition::NotGuiltyAcquittal, 0),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            RateCalculator::compute(&aggregates).unwrap_err(),
            StatsError::DivisionByZero { year: 2016 }
        );
    }

    #[test]
    fn records_are_ordered_by_year_then_disposition() {
        let aggregates: Aggregates = [
            (2019, Disposition::NotGuiltyAcquittal, 1),
            (2015, Disposition::Guilty, 3),
            (2019, Disposition::Guilty, 3),
            (2015, Disposition::NotGuiltyAcquittal, 1),
        ]
        .into_iter()
        .collect();
        let records = RateCalculator::compute(&aggregates).unwrap().to_records();
        let keys: Vec<(i32, Disposition)> =
            records.iter().map(|r| (r.year, r.disposition)).collect();
        assert_eq!(
            keys,
            vec![
                (2015, Disposition::Guilty),
                (2015, Disposition::NotGuiltyAcquittal),
                (2019, Disposition::Guilty),
                (2019, Disposition::NotGuiltyAcquittal),
            ]
        );
        assert!(close(records[0].percent, 75.0));
    }

    #[test]
    fn round2_rounds_to_hundredths() {
        assert!(close(round2(93.457943), 93.46));
        assert!(close(round2(6.542056), 6.54));
        assert!(close(round2(100.0), 100.0));
    }

    proptest! {
        #[test]
        fn percents_sum_to_one_hundred(guilty in 0u64..100_000, not_guilty in 0u64..100_000) {
            prop_assume!(guilty + not_guilty > 0);
            let aggregates: Aggregates = [
                (2017, Disposition::Guilty, guilty),
                (2017, Disposition::NotGuiltyAcquittal, not_guilty),
            ]
            .into_iter()
            .collect();
            let rates = RateCalculator::compute(&aggregates).unwrap();
            let sum = rates.percent(2017, Disposition::Guilty).unwrap()
                + rates.percent(2017, Disposition::NotGuiltyAcquittal).unwrap();
            prop_assert!((sum - 100.0).abs() <= 0.01 + 1e-9, "sum was {}", sum);
        }
    }
}
