//! Chart Data Module
//! Flattens a rate table into the per-line series the renderer draws.

use crate::config::DispositionLabels;
use crate::data::{Disposition, YearRateRecord};
use crate::stats::RateTable;
use plotters::style::RGBColor;

/// Line colors
pub const GUILTY_COLOR: RGBColor = RGBColor(231, 76, 60); // Red
pub const NOT_GUILTY_COLOR: RGBColor = RGBColor(52, 152, 219); // Blue

/// One line of the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub color: RGBColor,
    pub points: Vec<(i32, f64)>,
}

/// Everything needed to draw one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub title: String,
    pub records: Vec<YearRateRecord>,
    pub series: Vec<Series>,
}

impl ChartData {
    pub fn from_rates(title: &str, rates: &RateTable, labels: &DispositionLabels) -> Self {
        let records = rates.to_records();
        let series = Disposition::ALL
            .iter()
            .map(|&disposition| Series {
                label: labels.label(disposition).to_string(),
                color: Self::color(disposition),
                points: records
                    .iter()
                    .filter(|r| r.disposition == disposition)
                    .map(|r| (r.year, r.percent))
                    .collect(),
            })
            .collect();

        Self {
            title: title.to_string(),
            records,
            series,
        }
    }

    pub fn color(disposition: Disposition) -> RGBColor {
        match disposition {
            Disposition::Guilty => GUILTY_COLOR,
            Disposition::NotGuiltyAcquittal => NOT_GUILTY_COLOR,
        }
    }

    /// Inclusive x-axis bounds, widened by a year when only one is present.
    pub fn year_range(&self) -> Option<(i32, i32)> {
        let first = self.records.first()?.year;
        let last = self.records.last()?.year;
        if first == last {
            Some((first - 1, last + 1))
        } else {
            Some((first, last))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{Aggregates, RateCalculator};

    fn rates() -> RateTable {
        let aggregates: Aggregates = [
            (2014, Disposition::Guilty, 60),
            (2014, Disposition::NotGuiltyAcquittal, 40),
            (2015, Disposition::Guilty, 3),
            (2015, Disposition::NotGuiltyAcquittal, 1),
        ]
        .into_iter()
        .collect();
        RateCalculator::compute(&aggregates).unwrap()
    }

    #[test]
    fn splits_records_into_one_series_per_disposition() {
        let data = ChartData::from_rates("Outcomes", &rates(), &DispositionLabels::default());

        assert_eq!(data.records.len(), 4);
        assert_eq!(data.series.len(), 2);
        assert_eq!(data.series[0].label, "Guilty");
        assert_eq!(data.series[0].points, vec![(2014, 60.0), (2015, 75.0)]);
        assert_eq!(data.series[1].label, "Not Guilty/Acquittal");
        assert_eq!(data.series[1].points, vec![(2014, 40.0), (2015, 25.0)]);
        assert_ne!(data.series[0].color, data.series[1].color);
    }

    #[test]
    fn year_range_spans_observed_years() {
        let data = ChartData::from_rates("Outcomes", &rates(), &DispositionLabels::default());
        assert_eq!(data.year_range(), Some((2014, 2015)));
    }

    #[test]
    fn single_year_range_is_widened() {
        let aggregates: Aggregates = [
            (2019, Disposition::Guilty, 1),
            (2019, Disposition::NotGuiltyAcquittal, 1),
        ]
        .into_iter()
        .collect();
        let rates = RateCalculator::compute(&aggregates).unwrap();
        let data = ChartData::from_rates("One", &rates, &DispositionLabels::default());
        assert_eq!(data.year_range(), Some((2018, 2020)));
    }

    #[test]
    fn empty_table_has_no_range() {
        let data = ChartData::from_rates("None", &RateTable::default(), &DispositionLabels::default());
        assert_eq!(data.year_range(), None);
    }
}
