//! Analysis-aware chart assembly.
//!
//! `ascii` draws generic character grids; this module shapes the aggregate
//! tables and diagnostics into those calls, owning titles, labels and series
//! alignment.

use std::collections::{BTreeMap, BTreeSet};

use crate::aggregate::{RegionTotals, RegionYearTotals, SexRegionTotals, SexTotals};
use crate::plot::ascii::{
    BarGroup, LineSeries, render_bar_chart, render_grouped_bar_chart, render_histogram,
    render_line_chart, render_scatter_with_line,
};
use crate::stats::{Histogram, ProbabilityPlot};

/// Value, lower-CI and upper-CI sums across regions as three lines.
pub fn region_overview_chart(totals: &[RegionTotals], width: usize, height: usize) -> String {
    let x_labels: Vec<String> = totals.iter().map(|t| t.region_name.clone()).collect();
    let series = [
        LineSeries {
            label: "Value".to_string(),
            values: totals.iter().map(|t| Some(t.value)).collect(),
        },
        LineSeries {
            label: "Lower CI".to_string(),
            values: totals.iter().map(|t| Some(t.lower_ci)).collect(),
        },
        LineSeries {
            label: "Upper CI".to_string(),
            values: totals.iter().map(|t| Some(t.upper_ci)).collect(),
        },
    ];
    render_line_chart(
        "Regional overview (value and CI sums)",
        &x_labels,
        &series,
        width,
        height,
    )
}

pub fn region_bar_chart(totals: &[RegionTotals], width: usize) -> String {
    let bars: Vec<(String, f64)> = totals
        .iter()
        .map(|t| (t.region_name.clone(), t.value))
        .collect();
    render_bar_chart("Value sum by region", &bars, width)
}

pub fn sex_bar_chart(totals: &[SexTotals], width: usize) -> String {
    let bars: Vec<(String, f64)> = totals
        .iter()
        .map(|t| (t.sex.label().to_string(), t.value))
        .collect();
    render_bar_chart("Value sum by gender", &bars, width)
}

/// Grouped bars, one group per region with its male and female sums.
pub fn sex_region_chart(totals: &[SexRegionTotals], width: usize) -> String {
    // The input is sorted by sex first, so each region's bars arrive in
    // Male, Female order.
    let mut grouped: BTreeMap<String, Vec<(String, f64)>> = BTreeMap::new();
    for t in totals {
        grouped
            .entry(t.region_name.clone())
            .or_default()
            .push((t.sex.label().to_string(), t.value));
    }
    let groups: Vec<BarGroup> = grouped
        .into_iter()
        .map(|(label, bars)| BarGroup { label, bars })
        .collect();
    render_grouped_bar_chart("Value sum by gender and region", &groups, width)
}

/// One line per region over the shared, sorted year axis.
///
/// Regions missing a year get a gap there, not an interpolated segment.
pub fn region_year_chart(totals: &[RegionYearTotals], width: usize, height: usize) -> String {
    let years: BTreeSet<&str> = totals.iter().map(|t| t.year.as_str()).collect();
    let years: Vec<String> = years.into_iter().map(str::to_string).collect();
    let index: BTreeMap<&str, usize> = years
        .iter()
        .enumerate()
        .map(|(i, y)| (y.as_str(), i))
        .collect();

    let mut by_region: BTreeMap<&str, Vec<Option<f64>>> = BTreeMap::new();
    for t in totals {
        let values = by_region
            .entry(t.region_name.as_str())
            .or_insert_with(|| vec![None; years.len()]);
        values[index[t.year.as_str()]] = Some(t.value);
    }
    let series: Vec<LineSeries> = by_region
        .into_iter()
        .map(|(label, values)| LineSeries {
            label: label.to_string(),
            values,
        })
        .collect();
    render_line_chart("Value sum by region and year", &years, &series, width, height)
}

pub fn probplot_chart(plot: &ProbabilityPlot, width: usize, height: usize) -> String {
    render_scatter_with_line(
        "Normal probability plot (male - female differences)",
        &plot.theoretical,
        &plot.ordered,
        &plot.line,
        width,
        height,
    )
}

pub fn difference_histogram(hist: &Histogram, width: usize) -> String {
    render_histogram(
        "Histogram (male - female differences)",
        &hist.edges,
        &hist.counts,
        width,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Sex;

    fn ryt(region: &str, year: &str, value: f64) -> RegionYearTotals {
        RegionYearTotals {
            region_name: region.to_string(),
            year: year.to_string(),
            value,
        }
    }

    #[test]
    fn region_year_chart_aligns_series_on_the_shared_year_axis() {
        // London is missing 2002; its line must show a gap, not a segment.
        let totals = vec![
            ryt("London", "2001", 10.0),
            ryt("London", "2003", 12.0),
            ryt("North East", "2001", 20.0),
            ryt("North East", "2002", 21.0),
            ryt("North East", "2003", 22.0),
        ];
        let chart = region_year_chart(&totals, 30, 8);

        assert!(chart.contains("x=2001..2003"));
        assert!(chart.contains("* London"));
        assert!(chart.contains("+ North East"));
    }

    #[test]
    fn sex_region_chart_keeps_male_before_female_within_a_group() {
        let totals = vec![
            SexRegionTotals {
                sex: Sex::Male,
                region_name: "London".to_string(),
                value: 10.0,
            },
            SexRegionTotals {
                sex: Sex::Female,
                region_name: "London".to_string(),
                value: 4.0,
            },
        ];
        let chart = sex_region_chart(&totals, 20);

        let male_at = chart.find("Male").unwrap();
        let female_at = chart.find("Female").unwrap();
        assert!(male_at < female_at);
    }

    #[test]
    fn empty_aggregates_render_placeholders() {
        assert!(region_bar_chart(&[], 40).contains("(no data)"));
        assert!(sex_bar_chart(&[], 40).contains("(no data)"));
        assert!(region_year_chart(&[], 40, 10).contains("(no data)"));
    }
}
