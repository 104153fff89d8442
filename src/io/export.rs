//! Result exports.
//!
//! - cleaned records to CSV (easy to diff or load into a spreadsheet)
//! - the full analysis report to JSON (via serde)

use std::path::Path;

use serde::Serialize;

use crate::domain::CleanedRecord;
use crate::error::AppError;

/// Column order of the cleaned-records CSV.
const CLEANED_HEADERS: [&str; 7] = [
    "region_code",
    "region_name",
    "sex",
    "year",
    "value",
    "lower_ci",
    "upper_ci",
];

/// Write cleaned records to a CSV file.
pub fn write_cleaned_csv(path: &Path, records: &[CleanedRecord]) -> Result<(), AppError> {
    let bytes = cleaned_csv_bytes(records)?;
    std::fs::write(path, bytes).map_err(|e| {
        AppError::internal(format!(
            "Failed to write cleaned CSV '{}': {e}",
            path.display()
        ))
    })
}

/// Render cleaned records as CSV bytes.
///
/// Values use the shortest round-trippable float formatting, so re-reading the
/// file reproduces the records exactly.
pub fn cleaned_csv_bytes(records: &[CleanedRecord]) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(CLEANED_HEADERS)
        .map_err(|e| AppError::internal(format!("Failed to write cleaned CSV header: {e}")))?;

    for r in records {
        writer
            .write_record([
                r.region_code.as_str(),
                r.region_name.as_str(),
                r.sex.label(),
                r.year.as_str(),
                &r.value.to_string(),
                &r.lower_ci.to_string(),
                &r.upper_ci.to_string(),
            ])
            .map_err(|e| AppError::internal(format!("Failed to write cleaned CSV row: {e}")))?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::internal(format!("Failed to finish cleaned CSV: {e}")))
}

/// Write any serializable report to pretty-printed JSON.
pub fn write_report_json<T: Serialize>(path: &Path, report: &T) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| AppError::internal(format!("Failed to serialize report: {e}")))?;
    std::fs::write(path, json).map_err(|e| {
        AppError::internal(format!(
            "Failed to write report JSON '{}': {e}",
            path.display()
        ))
    })
}
