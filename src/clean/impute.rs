//! Median imputation of missing numeric cells.
//!
//! Each of the three numeric columns (value, lower CI, upper CI) is filled
//! independently with that column's median over the already-filtered rows.
//! Medians are computed before any fill, so the operation is idempotent:
//! running it over its own output changes nothing.

use crate::domain::CleanedRecord;

use super::FilteredRow;

/// How many cells each column filled, and how many rows could not be filled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillCounts {
    pub value: usize,
    pub lower_ci: usize,
    pub upper_ci: usize,
    /// Rows dropped because a missing cell had no median to fill from (the
    /// whole column was empty). Cannot happen on the published datasets.
    pub dropped: usize,
}

/// Median of a sample. `None` for an empty sample.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

pub(crate) fn fill_with_medians(rows: Vec<FilteredRow>) -> (Vec<CleanedRecord>, FillCounts) {
    let value_median = median(&observed(&rows, |r| r.value));
    let lower_median = median(&observed(&rows, |r| r.lower_ci));
    let upper_median = median(&observed(&rows, |r| r.upper_ci));

    let mut counts = FillCounts::default();
    let mut records = Vec::with_capacity(rows.len());

    for row in rows {
        let filled = (
            row.value.or(value_median),
            row.lower_ci.or(lower_median),
            row.upper_ci.or(upper_median),
        );
        let (Some(value), Some(lower_ci), Some(upper_ci)) = filled else {
            counts.dropped += 1;
            continue;
        };

        if row.value.is_none() {
            counts.value += 1;
        }
        if row.lower_ci.is_none() {
            counts.lower_ci += 1;
        }
        if row.upper_ci.is_none() {
            counts.upper_ci += 1;
        }

        records.push(CleanedRecord {
            region_code: row.region_code,
            region_name: row.region_name,
            sex: row.sex,
            year: row.year,
            value,
            lower_ci,
            upper_ci,
        });
    }

    (records, counts)
}

fn observed(rows: &[FilteredRow], get: impl Fn(&FilteredRow) -> Option<f64>) -> Vec<f64> {
    rows.iter().filter_map(get).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Sex;

    fn row(value: Option<f64>, lower: Option<f64>, upper: Option<f64>) -> FilteredRow {
        FilteredRow {
            region_code: "E12000001".to_string(),
            region_name: "North East".to_string(),
            sex: Sex::Male,
            year: "2001".to_string(),
            value,
            lower_ci: lower,
            upper_ci: upper,
        }
    }

    #[test]
    fn median_ignores_nothing_and_averages_even_counts() {
        assert_eq!(median(&[10.0, 20.0, 30.0]), Some(20.0));
        assert_eq!(median(&[30.0, 10.0]), Some(20.0));
        assert_eq!(median(&[7.0]), Some(7.0));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn missing_values_get_the_column_median_of_observed_cells() {
        // Column pattern [10, missing, 20, missing, 30]: median of the
        // observed cells is 20, and both gaps receive it.
        let rows = vec![
            row(Some(10.0), Some(1.0), Some(2.0)),
            row(None, Some(1.0), Some(2.0)),
            row(Some(20.0), Some(1.0), Some(2.0)),
            row(None, Some(1.0), Some(2.0)),
            row(Some(30.0), Some(1.0), Some(2.0)),
        ];
        let (records, counts) = fill_with_medians(rows);

        assert_eq!(records.len(), 5);
        assert_eq!(records[1].value, 20.0);
        assert_eq!(records[3].value, 20.0);
        assert_eq!(counts.value, 2);
        assert_eq!(counts.lower_ci, 0);
        assert_eq!(counts.upper_ci, 0);
        assert_eq!(counts.dropped, 0);
    }

    #[test]
    fn columns_fill_independently() {
        let rows = vec![
            row(Some(10.0), None, Some(12.0)),
            row(None, Some(8.0), Some(14.0)),
            row(Some(30.0), Some(24.0), None),
        ];
        let (records, counts) = fill_with_medians(rows);

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].lower_ci, 16.0); // median of [8, 24]
        assert_eq!(records[1].value, 20.0); // median of [10, 30]
        assert_eq!(records[2].upper_ci, 13.0); // median of [12, 14]
        assert_eq!((counts.value, counts.lower_ci, counts.upper_ci), (1, 1, 1));
    }

    #[test]
    fn filling_is_idempotent() {
        let rows = vec![
            row(Some(10.0), Some(1.0), Some(2.0)),
            row(None, Some(3.0), None),
            row(Some(20.0), None, Some(6.0)),
        ];
        let (records, _) = fill_with_medians(rows);

        let again: Vec<FilteredRow> = records
            .iter()
            .map(|r| {
                FilteredRow {
                    region_code: r.region_code.clone(),
                    region_name: r.region_name.clone(),
                    sex: r.sex,
                    year: r.year.clone(),
                    value: Some(r.value),
                    lower_ci: Some(r.lower_ci),
                    upper_ci: Some(r.upper_ci),
                }
            })
            .collect();
        let (records2, counts2) = fill_with_medians(again);

        assert_eq!(records2, records);
        assert_eq!(counts2, FillCounts::default());
    }

    #[test]
    fn an_entirely_empty_column_drops_its_rows() {
        let rows = vec![row(Some(10.0), None, Some(2.0)), row(Some(20.0), None, Some(4.0))];
        let (records, counts) = fill_with_medians(rows);

        assert!(records.is_empty());
        assert_eq!(counts.dropped, 2);
        assert_eq!(counts.lower_ci, 0);
    }
}
