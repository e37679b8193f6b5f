//! Aggregator Module
//! Sums case counts per (year, disposition).

use crate::data::{CaseOutcomeRecord, Disposition};
use std::collections::BTreeMap;

/// Case totals keyed by (year, disposition).
///
/// Only combinations observed in the input are present; nothing is zero-filled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregates {
    totals: BTreeMap<(i32, Disposition), u64>,
}

impl Aggregates {
    pub fn get(&self, year: i32, disposition: Disposition) -> Option<u64> {
        self.totals.get(&(year, disposition)).copied()
    }

    pub(crate) fn set(&mut self, year: i32, disposition: Disposition, total: u64) {
        self.totals.insert((year, disposition), total);
    }

    /// Distinct years, ascending.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.totals.keys().map(|(year, _)| *year).collect();
        years.dedup();
        years
    }

    /// Sum across whichever dispositions exist for `year`.
    pub fn year_total(&self, year: i32) -> u64 {
        Disposition::ALL
            .iter()
            .filter_map(|d| self.get(year, *d))
            .sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, Disposition, u64)> + '_ {
        self.totals.iter().map(|(&(year, d), &total)| (year, d, total))
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

impl FromIterator<(i32, Disposition, u64)> for Aggregates {
    fn from_iter<I: IntoIterator<Item = (i32, Disposition, u64)>>(iter: I) -> Self {
        let mut aggregates = Aggregates::default();
        for (year, disposition, total) in iter {
            aggregates.set(year, disposition, total);
        }
        aggregates
    }
}

/// Groups normalized records.
pub struct Aggregator;

impl Aggregator {
    pub fn aggregate(records: &[CaseOutcomeRecord]) -> Aggregates {
        let mut aggregates = Aggregates::default();
        for record in records {
            *aggregates
                .totals
                .entry((record.year(), record.disposition))
                .or_insert(0) += record.count;
        }

        log::debug!(
            "Aggregated {} records into {} (year, disposition) buckets",
            records.len(),
            aggregates.len()
        );
        for (year, disposition, total) in aggregates.iter() {
            log::debug!("{year} {disposition}: {total}");
        }
        aggregates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn record(y: i32, m: u32, d: u32, disposition: Disposition, count: u64) -> CaseOutcomeRecord {
        CaseOutcomeRecord {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            disposition,
            count,
        }
    }

    #[test]
    fn sums_per_year_and_disposition() {
        let records = vec![
            record(2018, 1, 3, Disposition::Guilty, 2),
            record(2018, 11, 30, Disposition::Guilty, 5),
            record(2018, 6, 1, Disposition::NotGuiltyAcquittal, 1),
            record(2019, 2, 14, Disposition::Guilty, 4),
        ];
        let aggregates = Aggregator::aggregate(&records);

        assert_eq!(aggregates.get(2018, Disposition::Guilty), Some(7));
        assert_eq!(aggregates.get(2018, Disposition::NotGuiltyAcquittal), Some(1));
        assert_eq!(aggregates.get(2019, Disposition::Guilty), Some(4));
        assert_eq!(aggregates.len(), 3);
        assert_eq!(aggregates.years(), vec![2018, 2019]);
        assert_eq!(aggregates.year_total(2018), 8);
    }

    #[test]
    fn absent_combinations_are_not_zero_filled() {
        let records = vec![record(2019, 5, 5, Disposition::Guilty, 3)];
        let aggregates = Aggregator::aggregate(&records);
        assert_eq!(aggregates.get(2019, Disposition::NotGuiltyAcquittal), None);
    }

    #[test]
    fn zero_count_rows_still_create_a_bucket() {
        let records = vec![record(2017, 5, 5, Disposition::NotGuiltyAcquittal, 0)];
        let aggregates = Aggregator::aggregate(&records);
        assert_eq!(aggregates.get(2017, Disposition::NotGuiltyAcquittal), Some(0));
    }

    #[test]
    fn empty_input_yields_empty_aggregates() {
        assert!(Aggregator::aggregate(&[]).is_empty());
    }

    fn arb_record() -> impl Strategy<Value = CaseOutcomeRecord> {
        (2014i32..=2019, 1u32..=12, 1u32..=28, any::<bool>(), 0u64..500).prop_map(
            |(y, m, d, guilty, count)| {
                let disposition = if guilty {
                    Disposition::Guilty
                } else {
                    Disposition::NotGuiltyAcquittal
                };
                record(y, m, d, disposition, count)
            },
        )
    }

    proptest! {
        #[test]
        fn aggregation_is_order_independent(
            records in prop::collection::vec(arb_record(), 0..60),
            seed in any::<u64>(),
        ) {
            let mut shuffled = records.clone();
            // deterministic permutation
            let n = shuffled.len();
            if n > 1 {
                let mut state = seed;
                for i in (1..n).rev() {
                    state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                    let j = (state >> 33) as usize % (i + 1);
                    shuffled.swap(i, j);
                }
            }
            prop_assert_eq!(Aggregator::aggregate(&records), Aggregator::aggregate(&shuffled));
        }

        #[test]
        fn totals_preserve_overall_sum(records in prop::collection::vec(arb_record(), 0..60)) {
            let aggregates = Aggregator::aggregate(&records);
            let expected: u64 = records.iter().map(|r| r.count).sum();
            let actual: u64 = aggregates.iter().map(|(_, _, total)| total).sum();
            prop_assert_eq!(actual, expected);
        }
    }
}
