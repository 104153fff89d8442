//! The cleaning pipeline.
//!
//! Four stages, applied in order to every ingested row:
//!
//! 1. region resolution (`region`)
//! 2. filtering: region allow-list, then `Sex = Persons`
//! 3. time-period parsing (`period`)
//! 4. median imputation of missing numerics (`impute`)
//!
//! Cleaning is deterministic and total: malformed rows are dropped and
//! counted, never raised. The returned `CleanReport` accounts for every input
//! row.

use serde::{Deserialize, Serialize};

use crate::domain::{CleanedRecord, MortalityRow, Sex, is_region_code};
use crate::io::lookup::RegionLookup;

pub mod impute;
pub mod period;
pub mod region;

pub use impute::{FillCounts, median};
pub use period::{SplitPeriod, parse_time_period};
pub use region::{RegionTier, ResolvedRegion, resolve_region};

/// Row accounting for one cleaning run.
///
/// The three `resolved_*` tiers partition `rows_in`; the `dropped_*` counters
/// plus `rows_out` account for where each row ended up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanReport {
    pub rows_in: usize,
    pub rows_out: usize,

    pub resolved_by_la: usize,
    pub resolved_by_region: usize,
    pub resolved_fallback: usize,

    pub dropped_region: usize,
    pub dropped_sex: usize,
    pub dropped_period: usize,
    pub dropped_unimputable: usize,

    pub imputed_value: usize,
    pub imputed_lower_ci: usize,
    pub imputed_upper_ci: usize,
}

/// Row between filtering and imputation: region, sex and period are settled,
/// numeric columns may still be missing.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FilteredRow {
    pub region_code: String,
    pub region_name: String,
    pub sex: Sex,
    pub year: String,
    pub value: Option<f64>,
    pub lower_ci: Option<f64>,
    pub upper_ci: Option<f64>,
}

/// Run the full cleaning pipeline over ingested rows.
pub fn clean(rows: &[MortalityRow], lookup: &RegionLookup) -> (Vec<CleanedRecord>, CleanReport) {
    let mut report = CleanReport {
        rows_in: rows.len(),
        ..CleanReport::default()
    };
    let mut filtered = Vec::with_capacity(rows.len());

    for row in rows {
        let resolved = resolve_region(&row.area_code, row.area_name.as_deref(), lookup);
        match resolved.tier {
            RegionTier::LaMatch => report.resolved_by_la += 1,
            RegionTier::RegionMatch => report.resolved_by_region += 1,
            RegionTier::SelfFallback => report.resolved_fallback += 1,
        }

        if !is_region_code(&resolved.code) {
            report.dropped_region += 1;
            continue;
        }
        if row.sex == Sex::Persons {
            report.dropped_sex += 1;
            continue;
        }
        let Some(period) = parse_time_period(&row.time_period) else {
            report.dropped_period += 1;
            continue;
        };

        filtered.push(FilteredRow {
            region_code: resolved.code,
            region_name: resolved.name,
            sex: row.sex,
            year: period.year,
            value: row.value,
            lower_ci: row.lower_ci,
            upper_ci: row.upper_ci,
        });
    }

    let (records, fills) = impute::fill_with_medians(filtered);
    report.imputed_value = fills.value;
    report.imputed_lower_ci = fills.lower_ci;
    report.imputed_upper_ci = fills.upper_ci;
    report.dropped_unimputable = fills.dropped;
    report.rows_out = records.len();

    (records, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RegionLookupEntry;

    fn lookup() -> RegionLookup {
        RegionLookup::from_entries(vec![RegionLookupEntry {
            la_code: "E06000001".to_string(),
            la_name: Some("Hartlepool".to_string()),
            region_code: "E12000001".to_string(),
            region_name: "North East".to_string(),
        }])
    }

    fn raw(area_code: &str, sex: Sex, period: &str, value: Option<f64>) -> MortalityRow {
        MortalityRow {
            area_code: area_code.to_string(),
            area_name: Some("somewhere".to_string()),
            time_period: period.to_string(),
            sex,
            value,
            lower_ci: value.map(|v| v - 1.0),
            upper_ci: value.map(|v| v + 1.0),
            category_type: None,
            category: None,
            age: None,
            count: None,
            denominator: None,
            value_note: None,
        }
    }

    #[test]
    fn pipeline_filters_resolves_and_fills() {
        let rows = vec![
            // LA row, resolves to North East.
            raw("E06000001", Sex::Male, "2001 - 03", Some(10.0)),
            // Region-level row absent from the lookup: self-fallback, and the
            // code is allow-listed, so it survives.
            raw("E12000002", Sex::Female, "2001 - 03", Some(6.0)),
            // Combined series, dropped.
            raw("E06000001", Sex::Persons, "2001 - 03", Some(16.0)),
            // Not a region after resolution, dropped.
            raw("E99000001", Sex::Male, "2001 - 03", Some(3.0)),
            // Pooled range past twelve, dropped.
            raw("E06000001", Sex::Male, "2011 - 13", Some(4.0)),
            // Missing value, imputed with the column median.
            raw("E06000001", Sex::Female, "2002 - 04", None),
        ];

        let (records, report) = clean(&rows, &lookup());

        assert_eq!(report.rows_in, 6);
        assert_eq!(report.rows_out, 3);
        assert_eq!(report.dropped_region, 1);
        assert_eq!(report.dropped_sex, 1);
        assert_eq!(report.dropped_period, 1);
        assert_eq!(report.dropped_unimputable, 0);
        assert_eq!(report.imputed_value, 1);

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].region_code, "E12000001");
        assert_eq!(records[0].region_name, "North East");
        assert_eq!(records[0].year, "2001");
        assert_eq!(records[1].region_code, "E12000002");
        // Median of observed values [10, 6].
        assert_eq!(records[2].value, 8.0);
    }

    #[test]
    fn fully_valid_rows_survive_with_correct_region_sums() {
        let mut rows = Vec::new();
        for code in ["E12000001", "E12000002", "E12000003"] {
            for sex in [Sex::Male, Sex::Female] {
                let value = if sex == Sex::Male { 10.0 } else { 4.0 };
                let mut row = raw(code, sex, "2001 - 03", Some(value));
                // Distinct fallback names, one per region code.
                row.area_name = None;
                rows.push(row);
            }
        }

        let (records, report) = clean(&rows, &lookup());

        assert_eq!(report.rows_out, 6);
        assert_eq!(report.dropped_region, 0);
        assert_eq!(report.dropped_sex, 0);
        assert_eq!(report.dropped_period, 0);
        assert_eq!(report.imputed_value, 0);
        assert_eq!(report.imputed_lower_ci, 0);
        assert_eq!(report.imputed_upper_ci, 0);

        let totals = crate::aggregate::sum_by_region(&records);
        assert_eq!(totals.len(), 3);
        // Each region sums male 10 + female 4, CI bounds offset by 1 per row.
        assert!(totals.iter().all(|t| t.value == 14.0));
        assert!(totals.iter().all(|t| t.lower_ci == 12.0));
        assert!(totals.iter().all(|t| t.upper_ci == 16.0));
    }

    #[test]
    fn resolution_tiers_partition_the_input() {
        let rows = vec![
            raw("E06000001", Sex::Male, "2001 - 03", Some(1.0)),
            raw("E12000001", Sex::Male, "2001 - 03", Some(2.0)),
            raw("E12000009", Sex::Male, "2001 - 03", Some(3.0)),
            raw("X", Sex::Male, "2001 - 03", Some(4.0)),
        ];
        let (_, report) = clean(&rows, &lookup());

        assert_eq!(report.resolved_by_la, 1);
        assert_eq!(report.resolved_by_region, 1);
        assert_eq!(report.resolved_fallback, 2);
        assert_eq!(
            report.resolved_by_la + report.resolved_by_region + report.resolved_fallback,
            report.rows_in
        );
    }

    #[test]
    fn no_sex_persons_survives_and_no_missing_numbers_remain() {
        let rows = vec![
            raw("E12000001", Sex::Persons, "2001 - 03", Some(9.0)),
            raw("E12000001", Sex::Male, "2001 - 03", None),
            raw("E12000001", Sex::Female, "2001 - 03", Some(5.0)),
        ];
        let (records, _) = clean(&rows, &lookup());

        assert!(records.iter().all(|r| r.sex != Sex::Persons));
        assert!(records.iter().all(|r| r.value.is_finite()));
        assert!(records.iter().all(|r| r.lower_ci.is_finite()));
        assert!(records.iter().all(|r| r.upper_ci.is_finite()));
    }

    #[test]
    fn cleaning_twice_changes_nothing() {
        let rows = vec![
            raw("E06000001", Sex::Male, "2001 - 03", Some(10.0)),
            raw("E06000001", Sex::Female, "2001 - 03", None),
        ];
        let (records1, report1) = clean(&rows, &lookup());
        let (records2, report2) = clean(&rows, &lookup());
        assert_eq!(records1, records2);
        assert_eq!(report1, report2);
    }
}
