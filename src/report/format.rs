//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the cleaning/statistics code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use crate::aggregate::{RegionTotals, SexRegionTotals, SexTotals};
use crate::clean::CleanReport;
use crate::io::ingest::RowError;
use crate::report::AnalysisReport;
use crate::stats::{GenderComparison, SampleSummary, TTestResult};

/// Row errors shown in full before the summary truncates the list.
const MAX_ROW_ERRORS_SHOWN: usize = 5;

/// Format the cleaning accounting: rows in/out, per-stage drops, imputations.
pub fn format_clean_summary(
    disease_label: &str,
    rows_read: usize,
    report: &CleanReport,
    row_errors: &[RowError],
) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "=== phof - preventable mortality: {disease_label} ===\n"
    ));
    out.push_str(&format!(
        "Rows read: {rows_read} ({} malformed skipped)\n",
        row_errors.len()
    ));
    for err in row_errors.iter().take(MAX_ROW_ERRORS_SHOWN) {
        out.push_str(&format!("  line {}: {}\n", err.line, err.message));
    }
    if row_errors.len() > MAX_ROW_ERRORS_SHOWN {
        out.push_str(&format!(
            "  (+{} more)\n",
            row_errors.len() - MAX_ROW_ERRORS_SHOWN
        ));
    }

    out.push_str(&format!(
        "Region resolution: by LA code={} | by region code={} | self-fallback={}\n",
        report.resolved_by_la, report.resolved_by_region, report.resolved_fallback
    ));
    out.push_str(&format!(
        "Dropped: region={} | persons={} | period={} | unimputable={}\n",
        report.dropped_region, report.dropped_sex, report.dropped_period,
        report.dropped_unimputable
    ));
    out.push_str(&format!(
        "Imputed: value={} | lower CI={} | upper CI={}\n",
        report.imputed_value, report.imputed_lower_ci, report.imputed_upper_ci
    ));
    out.push_str(&format!("Rows kept: {}\n", report.rows_out));

    out
}

/// Format the per-region Value and CI sums.
pub fn format_region_table(totals: &[RegionTotals]) -> String {
    let mut out = String::new();
    out.push_str("Value and CI sums by region:\n");
    out.push_str(&format!(
        "{:<24} {:>12} {:>12} {:>12}\n",
        "Region", "Value", "Lower CI", "Upper CI"
    ));
    out.push_str(&format!("{:-<24} {:-<12} {:-<12} {:-<12}\n", "", "", "", ""));
    for t in totals {
        out.push_str(&format!(
            "{:<24} {:>12.2} {:>12.2} {:>12.2}\n",
            truncate(&t.region_name, 24),
            t.value,
            t.lower_ci,
            t.upper_ci
        ));
    }
    out
}

/// Format the per-gender Value sums.
pub fn format_sex_table(totals: &[SexTotals]) -> String {
    let mut out = String::new();
    out.push_str("Value sums by gender:\n");
    out.push_str(&format!("{:<8} {:>12}\n", "Sex", "Value"));
    out.push_str(&format!("{:-<8} {:-<12}\n", "", ""));
    for t in totals {
        out.push_str(&format!("{:<8} {:>12.2}\n", t.sex.label(), t.value));
    }
    out
}

/// Format the per-(gender, region) Value sums.
pub fn format_sex_region_table(totals: &[SexRegionTotals]) -> String {
    let mut out = String::new();
    out.push_str("Value sums by gender and region:\n");
    out.push_str(&format!("{:<8} {:<24} {:>12}\n", "Sex", "Region", "Value"));
    out.push_str(&format!("{:-<8} {:-<24} {:-<12}\n", "", "", ""));
    for t in totals {
        out.push_str(&format!(
            "{:<8} {:<24} {:>12.2}\n",
            t.sex.label(),
            truncate(&t.region_name, 24),
            t.value
        ));
    }
    out
}

/// Format the researchpy-style descriptives table (per gender + combined).
pub fn format_descriptives(cmp: &GenderComparison) -> String {
    let mut out = String::new();
    out.push_str("Descriptive statistics:\n");
    out.push_str(&format!(
        "{:<8} {:>5} {:>10} {:>10} {:>10} {}\n",
        "Group", "N", "Mean", "SD", "SE", "95% CI"
    ));
    out.push_str(&format!(
        "{:-<8} {:-<5} {:-<10} {:-<10} {:-<10} {:-<22}\n",
        "", "", "", "", "", ""
    ));
    for s in [&cmp.male, &cmp.female, &cmp.combined] {
        out.push_str(&format_summary_row(s));
    }
    out
}

fn format_summary_row(s: &SampleSummary) -> String {
    format!(
        "{:<8} {:>5} {:>10.4} {:>10.4} {:>10.4} [{:.4}, {:.4}]\n",
        truncate(&s.label, 8),
        s.n,
        s.mean,
        s.sd,
        s.se,
        s.ci_low,
        s.ci_high
    )
}

/// Format the t-test results block, one labelled value per line.
pub fn format_t_test(test: &TTestResult) -> String {
    let mut out = String::new();
    out.push_str("Independent two-sample t-test (pooled variance):\n");
    let rows = [
        ("Difference (Male - Female)", test.mean_diff),
        ("Degrees of freedom", test.df),
        ("t statistic", test.t),
        ("Two-sided p", test.p_two_sided),
        ("P(difference < 0)", test.p_less),
        ("P(difference > 0)", test.p_greater),
        ("Cohen's d", test.cohen_d),
        ("Hedges' g", test.hedges_g),
        ("Glass's delta", test.glass_delta),
        ("Pearson's r", test.pearson_r),
    ];
    for (label, value) in rows {
        out.push_str(&format!("{label:<26} = {value:>10.4}\n"));
    }
    out
}

/// Compose every section of the terminal report, in reading order.
pub fn format_analysis_report(report: &AnalysisReport, row_errors: &[RowError]) -> String {
    let mut out = String::new();
    out.push_str(&format_clean_summary(
        report.disease.display_name(),
        report.rows_read,
        &report.clean,
        row_errors,
    ));
    out.push('\n');
    out.push_str(&format_region_table(&report.region_totals));
    out.push('\n');
    out.push_str(&format_sex_table(&report.sex_totals));
    out.push('\n');
    out.push_str(&format_sex_region_table(&report.sex_region_totals));
    out.push('\n');
    out.push_str(&format_descriptives(&report.comparison));
    out.push('\n');
    out.push_str(&format_t_test(&report.comparison.test));

    out.push_str(&format!(
        "\nPaired difference series: {} keys ({} unpaired skipped)\n",
        report.differences.len(),
        report.unpaired_keys
    ));
    if let Some(r) = report.probplot_r {
        out.push_str(&format!(
            "Probability plot r = {r:.4} (1.0 means the differences sit on the normal line)\n"
        ));
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Sex;
    use crate::stats::compare_by_gender;
    use crate::stats::ttest::students_t_test;

    #[test]
    fn clean_summary_golden() {
        let report = CleanReport {
            rows_in: 8,
            rows_out: 4,
            resolved_by_la: 5,
            resolved_by_region: 2,
            resolved_fallback: 1,
            dropped_region: 1,
            dropped_sex: 2,
            dropped_period: 1,
            dropped_unimputable: 0,
            imputed_value: 1,
            imputed_lower_ci: 0,
            imputed_upper_ci: 0,
        };
        let errors = vec![RowError {
            line: 3,
            message: "Missing required field 'Sex'".to_string(),
        }];

        let txt = format_clean_summary("suicide", 9, &report, &errors);
        let expected = concat!(
            "=== phof - preventable mortality: suicide ===\n",
            "Rows read: 9 (1 malformed skipped)\n",
            "  line 3: Missing required field 'Sex'\n",
            "Region resolution: by LA code=5 | by region code=2 | self-fallback=1\n",
            "Dropped: region=1 | persons=2 | period=1 | unimputable=0\n",
            "Imputed: value=1 | lower CI=0 | upper CI=0\n",
            "Rows kept: 4\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn region_table_golden() {
        let totals = vec![
            RegionTotals {
                region_name: "London".to_string(),
                value: 100.5,
                lower_ci: 90.25,
                upper_ci: 110.75,
            },
            RegionTotals {
                region_name: "North East".to_string(),
                value: 50.0,
                lower_ci: 45.0,
                upper_ci: 55.0,
            },
        ];
        let txt = format_region_table(&totals);
        let expected = concat!(
            "Value and CI sums by region:\n",
            "Region                          Value     Lower CI     Upper CI\n",
            "------------------------ ------------ ------------ ------------\n",
            "London                         100.50        90.25       110.75\n",
            "North East                      50.00        45.00        55.00\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn descriptives_golden() {
        fn rec(sex: Sex, value: f64) -> crate::domain::CleanedRecord {
            crate::domain::CleanedRecord {
                region_code: "E12000001".to_string(),
                region_name: "North East".to_string(),
                sex,
                year: "2001".to_string(),
                value,
                lower_ci: value,
                upper_ci: value,
            }
        }
        let records = vec![
            rec(Sex::Male, 10.0),
            rec(Sex::Male, 14.0),
            rec(Sex::Male, 12.0),
            rec(Sex::Female, 5.0),
            rec(Sex::Female, 7.0),
            rec(Sex::Female, 6.0),
        ];
        let cmp = compare_by_gender(&records).unwrap();

        let txt = format_descriptives(&cmp);
        let expected = concat!(
            "Descriptive statistics:\n",
            "Group        N       Mean         SD         SE 95% CI\n",
            "-------- ----- ---------- ---------- ---------- ----------------------\n",
            "Male         3    12.0000     2.0000     1.1547 [7.0317, 16.9683]\n",
            "Female       3     6.0000     1.0000     0.5774 [3.5159, 8.4841]\n",
            "Combined     6     9.0000     3.5777     1.4606 [5.2454, 12.7546]\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn t_test_golden() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [2.0, 3.0, 4.0, 5.0, 6.0];
        let test = students_t_test(&a, &b).unwrap();

        let txt = format_t_test(&test);
        let expected = concat!(
            "Independent two-sample t-test (pooled variance):\n",
            "Difference (Male - Female) =    -1.0000\n",
            "Degrees of freedom         =     8.0000\n",
            "t statistic                =    -1.0000\n",
            "Two-sided p                =     0.3466\n",
            "P(difference < 0)          =     0.1733\n",
            "P(difference > 0)          =     0.8267\n",
            "Cohen's d                  =    -0.6325\n",
            "Hedges' g                  =    -0.5713\n",
            "Glass's delta              =    -0.6325\n",
            "Pearson's r                =     0.3333\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn long_region_names_are_truncated() {
        let totals = vec![SexRegionTotals {
            sex: Sex::Male,
            region_name: "A name well beyond twenty-four characters".to_string(),
            value: 1.0,
        }];
        let txt = format_sex_region_table(&totals);
        assert!(txt.contains("A name well beyond twen."));
    }
}
