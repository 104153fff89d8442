//! Debug bundle writer for inspecting a full analysis run.
//!
//! The bundle is a timestamped markdown file under `debug/` holding what the
//! terminal report summarizes: the cleaning ledger with every malformed row,
//! all aggregate tables, the keyed gender pairing and the test numbers. It is
//! meant to be diffed between runs when an input file changes.

use std::collections::hash_map::DefaultHasher;
use std::fs::{File, create_dir_all};
use std::hash::{Hash, Hasher};
use std::io::Write;
use std::path::PathBuf;

use chrono::Local;

use crate::aggregate::GenderPairs;
use crate::error::AppError;
use crate::io::ingest::RowError;
use crate::report::AnalysisReport;
use crate::stats::SampleSummary;

pub fn write_debug_bundle(
    report: &AnalysisReport,
    row_errors: &[RowError],
    pairs: &GenderPairs,
) -> Result<PathBuf, AppError> {
    let dir = PathBuf::from("debug");
    create_dir_all(&dir)
        .map_err(|e| AppError::internal(format!("Failed to create debug dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("phof_debug_{}_{ts}.md", report.disease.slug()));

    let mut file = File::create(&path)
        .map_err(|e| AppError::internal(format!("Failed to create debug file: {e}")))?;

    writeln!(file, "# phof debug bundle")
        .map_err(|e| AppError::internal(format!("Failed to write debug header: {e}")))?;
    writeln!(file, "- generated: {}", Local::now().to_rfc3339())
        .map_err(|e| AppError::internal(format!("Failed to write debug header: {e}")))?;
    writeln!(file, "- disease: {}", report.disease.display_name())
        .map_err(|e| AppError::internal(format!("Failed to write debug header: {e}")))?;
    writeln!(file, "- rows_read: {}", report.rows_read)
        .map_err(|e| AppError::internal(format!("Failed to write debug header: {e}")))?;
    let digest = run_digest(
        report.rows_read,
        report.clean.rows_out,
        row_errors,
        &report.differences,
    );
    writeln!(file, "- run_digest: {digest:016x}")
        .map_err(|e| AppError::internal(format!("Failed to write debug header: {e}")))?;

    writeln!(file, "\n## Cleaning")
        .map_err(|e| AppError::internal(format!("Failed to write debug: {e}")))?;
    writeln!(file, "| counter | rows |")
        .map_err(|e| AppError::internal(format!("Failed to write debug: {e}")))?;
    writeln!(file, "| - | - |")
        .map_err(|e| AppError::internal(format!("Failed to write debug: {e}")))?;
    let clean = &report.clean;
    for (label, count) in [
        ("rows_in", clean.rows_in),
        ("rows_out", clean.rows_out),
        ("resolved_by_la", clean.resolved_by_la),
        ("resolved_by_region", clean.resolved_by_region),
        ("resolved_fallback", clean.resolved_fallback),
        ("dropped_region", clean.dropped_region),
        ("dropped_sex", clean.dropped_sex),
        ("dropped_period", clean.dropped_period),
        ("dropped_unimputable", clean.dropped_unimputable),
        ("imputed_value", clean.imputed_value),
        ("imputed_lower_ci", clean.imputed_lower_ci),
        ("imputed_upper_ci", clean.imputed_upper_ci),
    ] {
        writeln!(file, "| {label} | {count} |")
            .map_err(|e| AppError::internal(format!("Failed to write debug: {e}")))?;
    }

    writeln!(file, "\n### Malformed rows ({})", row_errors.len())
        .map_err(|e| AppError::internal(format!("Failed to write debug: {e}")))?;
    for err in row_errors {
        writeln!(file, "- line {}: {}", err.line, err.message)
            .map_err(|e| AppError::internal(format!("Failed to write debug: {e}")))?;
    }

    writeln!(file, "\n## Totals by region")
        .map_err(|e| AppError::internal(format!("Failed to write debug: {e}")))?;
    writeln!(file, "| region | value | lower_ci | upper_ci |")
        .map_err(|e| AppError::internal(format!("Failed to write debug: {e}")))?;
    writeln!(file, "| - | - | - | - |")
        .map_err(|e| AppError::internal(format!("Failed to write debug: {e}")))?;
    for row in &report.region_totals {
        writeln!(
            file,
            "| {} | {:.4} | {:.4} | {:.4} |",
            row.region_name, row.value, row.lower_ci, row.upper_ci
        )
        .map_err(|e| AppError::internal(format!("Failed to write debug: {e}")))?;
    }

    writeln!(file, "\n## Totals by sex")
        .map_err(|e| AppError::internal(format!("Failed to write debug: {e}")))?;
    writeln!(file, "| sex | value |")
        .map_err(|e| AppError::internal(format!("Failed to write debug: {e}")))?;
    writeln!(file, "| - | - |")
        .map_err(|e| AppError::internal(format!("Failed to write debug: {e}")))?;
    for row in &report.sex_totals {
        writeln!(file, "| {} | {:.4} |", row.sex.label(), row.value)
            .map_err(|e| AppError::internal(format!("Failed to write debug: {e}")))?;
    }

    writeln!(file, "\n## Totals by sex and region")
        .map_err(|e| AppError::internal(format!("Failed to write debug: {e}")))?;
    writeln!(file, "| sex | region | value |")
        .map_err(|e| AppError::internal(format!("Failed to write debug: {e}")))?;
    writeln!(file, "| - | - | - |")
        .map_err(|e| AppError::internal(format!("Failed to write debug: {e}")))?;
    for row in &report.sex_region_totals {
        writeln!(
            file,
            "| {} | {} | {:.4} |",
            row.sex.label(),
            row.region_name,
            row.value
        )
        .map_err(|e| AppError::internal(format!("Failed to write debug: {e}")))?;
    }

    writeln!(file, "\n## Totals by region and year")
        .map_err(|e| AppError::internal(format!("Failed to write debug: {e}")))?;
    writeln!(file, "| region | year | value |")
        .map_err(|e| AppError::internal(format!("Failed to write debug: {e}")))?;
    writeln!(file, "| - | - | - |")
        .map_err(|e| AppError::internal(format!("Failed to write debug: {e}")))?;
    for row in &report.region_year_totals {
        writeln!(
            file,
            "| {} | {} | {:.4} |",
            row.region_name, row.year, row.value
        )
        .map_err(|e| AppError::internal(format!("Failed to write debug: {e}")))?;
    }

    writeln!(file, "\n## Gender comparison")
        .map_err(|e| AppError::internal(format!("Failed to write debug: {e}")))?;
    writeln!(file, "| group | n | mean | sd | se | ci_low | ci_high |")
        .map_err(|e| AppError::internal(format!("Failed to write debug: {e}")))?;
    writeln!(file, "| - | - | - | - | - | - | - |")
        .map_err(|e| AppError::internal(format!("Failed to write debug: {e}")))?;
    for group in [
        &report.comparison.male,
        &report.comparison.female,
        &report.comparison.combined,
    ] {
        write_summary_row(&mut file, group)?;
    }

    let test = &report.comparison.test;
    for (label, value) in [
        ("mean_difference", test.mean_diff),
        ("df", test.df),
        ("t", test.t),
        ("p_two_sided", test.p_two_sided),
        ("p_less", test.p_less),
        ("p_greater", test.p_greater),
        ("cohen_d", test.cohen_d),
        ("hedges_g", test.hedges_g),
        ("glass_delta", test.glass_delta),
        ("pearson_r", test.pearson_r),
    ] {
        writeln!(file, "- {label}: {value:.6}")
            .map_err(|e| AppError::internal(format!("Failed to write debug: {e}")))?;
    }

    writeln!(
        file,
        "\n## Paired differences ({} keys, {} unpaired skipped)",
        pairs.pairs.len(),
        pairs.unpaired
    )
    .map_err(|e| AppError::internal(format!("Failed to write debug: {e}")))?;
    writeln!(file, "| region | year | male | female | male - female |")
        .map_err(|e| AppError::internal(format!("Failed to write debug: {e}")))?;
    writeln!(file, "| - | - | - | - | - |")
        .map_err(|e| AppError::internal(format!("Failed to write debug: {e}")))?;
    for pair in &pairs.pairs {
        writeln!(
            file,
            "| {} | {} | {:.4} | {:.4} | {:.4} |",
            pair.region_name,
            pair.year,
            pair.male,
            pair.female,
            pair.male - pair.female
        )
        .map_err(|e| AppError::internal(format!("Failed to write debug: {e}")))?;
    }

    writeln!(file, "\n## Normality diagnostics")
        .map_err(|e| AppError::internal(format!("Failed to write debug: {e}")))?;
    match report.probplot_r {
        Some(r) => writeln!(file, "- probability_plot_r: {r:.6}"),
        None => writeln!(file, "- probability_plot_r: n/a (fewer than two differences)"),
    }
    .map_err(|e| AppError::internal(format!("Failed to write debug: {e}")))?;

    if let Some(hist) = &report.histogram {
        writeln!(file, "\n| bin | count |")
            .map_err(|e| AppError::internal(format!("Failed to write debug: {e}")))?;
        writeln!(file, "| - | - |")
            .map_err(|e| AppError::internal(format!("Failed to write debug: {e}")))?;
        for (i, count) in hist.counts.iter().enumerate() {
            let bracket = if i + 1 == hist.counts.len() { ']' } else { ')' };
            writeln!(
                file,
                "| [{:.4}, {:.4}{bracket} | {count} |",
                hist.edges[i],
                hist.edges[i + 1]
            )
            .map_err(|e| AppError::internal(format!("Failed to write debug: {e}")))?;
        }
    }

    Ok(path)
}

fn write_summary_row(file: &mut File, group: &SampleSummary) -> Result<(), AppError> {
    writeln!(
        file,
        "| {} | {} | {:.6} | {:.6} | {:.6} | {:.6} | {:.6} |",
        group.label, group.n, group.mean, group.sd, group.se, group.ci_low, group.ci_high
    )
    .map_err(|e| AppError::internal(format!("Failed to write debug: {e}")))
}

/// Cheap run fingerprint: bundles from the same inputs hash the same, so two
/// bundles can be compared by header before diffing the body.
fn run_digest(
    rows_read: usize,
    rows_out: usize,
    row_errors: &[RowError],
    differences: &[f64],
) -> u64 {
    let mut hasher = DefaultHasher::new();
    rows_read.hash(&mut hasher);
    rows_out.hash(&mut hasher);
    row_errors.len().hash(&mut hasher);
    for err in row_errors {
        err.line.hash(&mut hasher);
        err.message.hash(&mut hasher);
    }
    for diff in differences {
        diff.to_bits().hash(&mut hasher);
    }
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_stable_and_input_sensitive() {
        let errors = vec![RowError {
            line: 7,
            message: "bad Value".to_string(),
        }];
        let diffs = vec![1.0, 2.0, 3.0];

        let a = run_digest(289, 180, &errors, &diffs);
        assert_eq!(a, run_digest(289, 180, &errors, &diffs));

        assert_ne!(a, run_digest(289, 180, &errors, &[1.5, 2.0, 3.0]));
        assert_ne!(a, run_digest(290, 180, &errors, &diffs));
        assert_ne!(a, run_digest(289, 180, &[], &diffs));
    }
}
