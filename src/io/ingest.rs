//! Dataset CSV ingest.
//!
//! Turns a published mortality CSV into `MortalityRow`s that are safe to feed
//! into the cleaning pipeline.
//!
//! Design goals:
//! - **Strict schema** for the four structural columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Lenient values**: a numeric cell that does not parse is a missing value,
//!   not an error; the imputation stage owns the fill policy

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{MortalityRow, Sex};
use crate::error::AppError;

/// A row-level problem encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: parsed rows + row errors + raw row count.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub rows: Vec<MortalityRow>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Load a mortality dataset CSV from disk.
pub fn load_mortality_rows(path: &Path) -> Result<IngestedData, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::input(format!("Failed to open dataset '{}': {e}", path.display()))
    })?;
    parse_mortality_csv(file)
}

/// Parse a mortality dataset CSV from any reader.
pub fn parse_mortality_csv<R: Read>(reader: R) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;

    let mut rows = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &header_map) {
            Ok(row) => rows.push(row),
            Err(e) => row_errors.push(RowError { line, message: e }),
        }
    }

    Ok(IngestedData {
        rows,
        row_errors,
        rows_read,
    })
}

pub(crate) fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

pub(crate) fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. If we don't strip it, schema validation will incorrectly
    // report missing columns. Spaces and underscores are squashed as well, so
    // "Area Code", "AreaCode" and "area_code" all map to the same key.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.chars()
        .filter(|c| *c != ' ' && *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    for (key, label) in [
        ("areacode", "Area Code"),
        ("timeperiod", "Time period"),
        ("sex", "Sex"),
        ("value", "Value"),
    ] {
        if !header_map.contains_key(key) {
            return Err(AppError::input(format!(
                "Missing required column: `{label}`"
            )));
        }
    }
    Ok(())
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<MortalityRow, String> {
    let area_code = get_required(record, header_map, "areacode", "Area Code")?.to_string();
    let time_period = get_required(record, header_map, "timeperiod", "Time period")?.to_string();

    let sex_raw = get_required(record, header_map, "sex", "Sex")?;
    let sex = Sex::parse(sex_raw).ok_or_else(|| format!("Unknown sex value '{sex_raw}'."))?;

    let area_name = get_optional(record, header_map, "areaname").map(str::to_string);
    let value = parse_opt_f64(get_optional(record, header_map, "value"));
    let lower_ci = parse_opt_f64(get_optional(record, header_map, "lowercilimit"));
    let upper_ci = parse_opt_f64(get_optional(record, header_map, "uppercilimit"));

    let category_type = get_optional(record, header_map, "categorytype").map(str::to_string);
    let category = get_optional(record, header_map, "category").map(str::to_string);
    let age = get_optional(record, header_map, "age").map(str::to_string);
    let count = parse_opt_f64(get_optional(record, header_map, "count"));
    let denominator = parse_opt_f64(get_optional(record, header_map, "denominator"));
    let value_note = get_optional(record, header_map, "valuenote").map(str::to_string);

    Ok(MortalityRow {
        area_code,
        area_name,
        time_period,
        sex,
        value,
        lower_ci,
        upper_ci,
        category_type,
        category,
        age,
        count,
        denominator,
        value_note,
    })
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    key: &str,
    label: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(key)
        .ok_or_else(|| format!("Missing required column: `{label}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{label}`"))
}

fn get_optional<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    key: &str,
) -> Option<&'a str> {
    let idx = header_map.get(key)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_opt_f64(s: Option<&str>) -> Option<f64> {
    let s = s?;
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Area Code,Area Name,Category Type,Category,Time period,Sex,Age,Value,Lower CI limit,Upper CI limit,Count,Denominator,Value note";

    fn parse(body: &str) -> IngestedData {
        let csv = format!("{HEADER}\n{body}");
        parse_mortality_csv(csv.as_bytes()).unwrap()
    }

    #[test]
    fn parses_a_full_row() {
        let data = parse("E12000001,North East,,,2001 - 03,Male,<75,13.5,12.1,14.9,321,100000,");
        assert_eq!(data.rows_read, 1);
        assert!(data.row_errors.is_empty());

        let row = &data.rows[0];
        assert_eq!(row.area_code, "E12000001");
        assert_eq!(row.area_name.as_deref(), Some("North East"));
        assert_eq!(row.time_period, "2001 - 03");
        assert_eq!(row.sex, Sex::Male);
        assert_eq!(row.value, Some(13.5));
        assert_eq!(row.lower_ci, Some(12.1));
        assert_eq!(row.upper_ci, Some(14.9));
        assert_eq!(row.count, Some(321.0));
    }

    #[test]
    fn missing_required_column_is_a_schema_error() {
        let csv = "Area Code,Time period,Sex\nE12000001,2001 - 03,Male";
        let err = parse_mortality_csv(csv.as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("Value"));
    }

    #[test]
    fn header_normalization_covers_spelling_drift() {
        assert_eq!(normalize_header_name("Area Code"), "areacode");
        assert_eq!(normalize_header_name("AreaCode"), "areacode");
        assert_eq!(normalize_header_name("area_code"), "areacode");
        assert_eq!(normalize_header_name("\u{feff}Area Code"), "areacode");
        assert_eq!(normalize_header_name("Lower CI limit"), "lowercilimit");

        // A BOM-prefixed header must still satisfy schema validation.
        let csv = "\u{feff}Area Code,Time period,Sex,Value\nE12000001,2001 - 03,Male,1.0";
        let data = parse_mortality_csv(csv.as_bytes()).unwrap();
        assert_eq!(data.rows.len(), 1);
    }

    #[test]
    fn bad_rows_are_collected_not_fatal() {
        let data = parse(concat!(
            "E12000001,North East,,,2001 - 03,Male,<75,13.5,12.1,14.9,,,\n",
            "E12000001,North East,,,2001 - 03,Martian,<75,13.5,,,,,\n",
            ",,,,2001 - 03,Male,<75,13.5,,,,,",
        ));
        assert_eq!(data.rows_read, 3);
        assert_eq!(data.rows.len(), 1);
        assert_eq!(data.row_errors.len(), 2);
        assert_eq!(data.row_errors[0].line, 3);
        assert!(data.row_errors[0].message.contains("Martian"));
        assert_eq!(data.row_errors[1].line, 4);
        assert!(data.row_errors[1].message.contains("Area Code"));
    }

    #[test]
    fn unparseable_numbers_are_missing_values() {
        let data = parse("E12000001,,,,2001 - 03,Female,,not-a-number,,,,,");
        assert_eq!(data.rows.len(), 1);
        assert_eq!(data.rows[0].value, None);
        assert!(data.row_errors.is_empty());
    }
}
