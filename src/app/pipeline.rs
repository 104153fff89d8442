//! Shared analysis pipeline used by every subcommand.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! ingest -> clean -> aggregate -> gender test -> normality diagnostics
//!
//! The command handlers can then focus on presentation (printing vs exports).

use crate::aggregate::{
    GenderPairs, difference_series, paired_gender_sums, sum_by_region, sum_by_region_year,
    sum_by_sex, sum_by_sex_region,
};
use crate::clean::{CleanReport, clean};
use crate::data::{demo_lookup, demo_rows};
use crate::domain::{AnalysisConfig, CleanedRecord};
use crate::error::AppError;
use crate::io::ingest::{IngestedData, RowError, load_mortality_rows};
use crate::io::lookup::{RegionLookup, load_region_lookup};
use crate::report::AnalysisReport;
use crate::stats::{ProbabilityPlot, compare_by_gender, histogram, probability_plot};

/// Cleaning outputs of one run, kept whole so the report layer can show the
/// per-row errors and the accounting next to the records.
#[derive(Debug, Clone)]
pub struct CleanRun {
    pub rows_read: usize,
    pub row_errors: Vec<RowError>,
    pub report: CleanReport,
    pub records: Vec<CleanedRecord>,
}

/// All computed outputs of a single analysis run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub clean: CleanRun,
    pub pairs: GenderPairs,
    pub probplot: Option<ProbabilityPlot>,
    pub report: AnalysisReport,
}

/// Ingest and clean the configured dataset.
pub fn run_clean(config: &AnalysisConfig) -> Result<CleanRun, AppError> {
    let ingested = load_mortality_rows(&config.data_path())?;
    let lookup = load_region_lookup(&config.lookup_path(), &config.lookup_sheet)?;
    Ok(clean_ingested(ingested, &lookup))
}

/// Execute the full pipeline from the configured input files.
pub fn run_analysis(config: &AnalysisConfig) -> Result<RunOutput, AppError> {
    let clean_run = run_clean(config)?;
    analyze(config, clean_run)
}

/// Execute the full pipeline over seeded synthetic data.
pub fn run_demo(seed: u64, config: &AnalysisConfig) -> Result<RunOutput, AppError> {
    let rows = demo_rows(seed)?;
    let lookup = demo_lookup();
    let ingested = IngestedData {
        rows_read: rows.len(),
        rows,
        row_errors: Vec::new(),
    };
    analyze(config, clean_ingested(ingested, &lookup))
}

fn clean_ingested(ingested: IngestedData, lookup: &RegionLookup) -> CleanRun {
    let (records, report) = clean(&ingested.rows, lookup);
    CleanRun {
        rows_read: ingested.rows_read,
        row_errors: ingested.row_errors,
        report,
        records,
    }
}

/// Aggregate, test and diagnose already-cleaned records.
pub fn analyze(config: &AnalysisConfig, clean_run: CleanRun) -> Result<RunOutput, AppError> {
    if clean_run.records.is_empty() {
        return Err(AppError::no_data(
            "No rows survived cleaning; nothing to analyze.",
        ));
    }
    let records = &clean_run.records;

    // 1) Group sums.
    let region_totals = sum_by_region(records);
    let sex_totals = sum_by_sex(records);
    let sex_region_totals = sum_by_sex_region(records);
    let region_year_totals = sum_by_region_year(records);

    // 2) Row-level gender comparison (descriptives + pooled t-test).
    let comparison = compare_by_gender(records)?;

    // 3) Keyed male-female difference series over (region, year) sums.
    let pairs = paired_gender_sums(records);
    let differences = difference_series(&pairs.pairs);

    // 4) Normality diagnostics over the differences. The keyed pairing can
    //    come up short even when the row-level test ran, so these are
    //    skipped rather than failing the run.
    let probplot = if differences.len() >= 2 {
        Some(probability_plot(&differences)?)
    } else {
        None
    };
    let hist = histogram(&differences, config.hist_bins);

    let report = AnalysisReport {
        disease: config.disease,
        rows_read: clean_run.rows_read,
        clean: clean_run.report.clone(),
        region_totals,
        sex_totals,
        sex_region_totals,
        region_year_totals,
        unpaired_keys: pairs.unpaired,
        differences,
        comparison,
        probplot_r: probplot.as_ref().map(|p| p.r),
        histogram: hist,
    };

    Ok(RunOutput {
        clean: clean_run,
        pairs,
        probplot,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DEFAULT_LOOKUP_SHEET, Disease};
    use std::path::PathBuf;

    fn demo_config() -> AnalysisConfig {
        AnalysisConfig {
            disease: Disease::Suicide,
            data_dir: PathBuf::from("data"),
            data_file: None,
            lookup_file: None,
            lookup_sheet: DEFAULT_LOOKUP_SHEET.to_string(),
            charts: false,
            chart_width: 80,
            chart_height: 15,
            hist_bins: 10,
            export_cleaned: None,
            export_report: None,
            debug_bundle: false,
        }
    }

    #[test]
    fn demo_run_produces_a_complete_report() {
        let run = run_demo(42, &demo_config()).unwrap();
        let report = &run.report;

        assert_eq!(report.clean.rows_out, 180);
        assert_eq!(report.region_totals.len(), 9);
        assert_eq!(report.sex_totals.len(), 2);
        assert_eq!(report.sex_region_totals.len(), 18);
        assert_eq!(report.region_year_totals.len(), 90);

        // Every (region, year) key has both genders in the demo data.
        assert_eq!(report.unpaired_keys, 0);
        assert_eq!(report.differences.len(), 90);

        // Male rates are generated well above female rates.
        assert!(report.comparison.test.mean_diff > 0.0);
        assert!(report.comparison.test.t > 0.0);
        assert!(report.comparison.test.p_two_sided < 0.01);

        // Near-normal differences: the probability plot is close to linear.
        let r = report.probplot_r.unwrap();
        assert!(r > 0.9, "probplot r = {r}");

        let hist = report.histogram.as_ref().unwrap();
        assert_eq!(hist.counts.iter().sum::<usize>(), 90);
    }

    #[test]
    fn report_json_round_trips() {
        let run = run_demo(7, &demo_config()).unwrap();
        let json = serde_json::to_string(&run.report).unwrap();
        let back: AnalysisReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, run.report);
    }

    #[test]
    fn empty_cleaning_output_is_a_no_data_error() {
        let clean_run = CleanRun {
            rows_read: 0,
            row_errors: Vec::new(),
            report: CleanReport::default(),
            records: Vec::new(),
        };
        let err = analyze(&demo_config(), clean_run).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
