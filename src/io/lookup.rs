//! Region lookup ingest.
//!
//! The lookup table maps local authority (LA) codes to the nine government
//! office regions. It is distributed as a legacy `.xls` workbook with one
//! relevant worksheet; a `.csv` export of the same table is accepted too,
//! keyed off the file extension.
//!
//! The loaded table is immutable for the process lifetime.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use crate::domain::RegionLookupEntry;
use crate::error::AppError;
use crate::io::ingest::normalize_header_name;

/// LA-to-region lookup, indexed both ways:
///
/// - `by_la_code`: LA code -> (region code, region name)
/// - `region_names`: region code -> region name (for rows that are themselves
///   region-level records)
#[derive(Debug, Clone, Default)]
pub struct RegionLookup {
    by_la_code: HashMap<String, (String, String)>,
    region_names: HashMap<String, String>,
}

impl RegionLookup {
    pub fn from_entries(entries: impl IntoIterator<Item = RegionLookupEntry>) -> Self {
        let mut lookup = RegionLookup::default();
        for entry in entries {
            lookup
                .by_la_code
                .entry(entry.la_code)
                .or_insert_with(|| (entry.region_code.clone(), entry.region_name.clone()));
            lookup
                .region_names
                .entry(entry.region_code)
                .or_insert(entry.region_name);
        }
        lookup
    }

    /// Region (code, name) for an LA code, if the LA is in the table.
    pub fn by_la(&self, la_code: &str) -> Option<(&str, &str)> {
        self.by_la_code
            .get(la_code)
            .map(|(code, name)| (code.as_str(), name.as_str()))
    }

    /// Region name for a region code, if the code appears in the table.
    pub fn region_name(&self, region_code: &str) -> Option<&str> {
        self.region_names.get(region_code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_la_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_la_code.is_empty()
    }
}

/// Load the region lookup from a `.xls`/`.xlsx` workbook or a `.csv` export.
pub fn load_region_lookup(path: &Path, sheet: &str) -> Result<RegionLookup, AppError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let entries = match ext.as_deref() {
        Some("xls") | Some("xlsx") | Some("xlsm") | Some("xlsb") | Some("ods") => {
            read_workbook_entries(path, sheet)?
        }
        _ => {
            let file = File::open(path).map_err(|e| {
                AppError::input(format!(
                    "Failed to open region lookup '{}': {e}",
                    path.display()
                ))
            })?;
            parse_lookup_csv(file)?
        }
    };

    Ok(RegionLookup::from_entries(entries))
}

fn read_workbook_entries(path: &Path, sheet: &str) -> Result<Vec<RegionLookupEntry>, AppError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| {
        AppError::input(format!(
            "Failed to open region lookup workbook '{}': {e}",
            path.display()
        ))
    })?;

    let range = workbook.worksheet_range(sheet).map_err(|e| {
        AppError::input(format!(
            "Failed to read worksheet '{sheet}' from '{}': {e}",
            path.display()
        ))
    })?;

    let mut rows = range.rows();
    let headers = rows
        .next()
        .ok_or_else(|| AppError::input(format!("Worksheet '{sheet}' is empty.")))?;

    let header_map: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .filter_map(|(idx, cell)| cell_text(cell).map(|name| (normalize_header_name(&name), idx)))
        .collect();
    let columns = LookupColumns::resolve(&header_map)?;

    let mut entries = Vec::new();
    for row in rows {
        if let Some(entry) = columns.entry_from(|idx| row.get(idx).and_then(cell_text)) {
            entries.push(entry);
        }
    }
    Ok(entries)
}

/// Parse a CSV export of the lookup table from any reader.
pub fn parse_lookup_csv<R: Read>(reader: R) -> Result<Vec<RegionLookupEntry>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read lookup headers: {e}")))?
        .clone();
    let header_map = crate::io::ingest::build_header_map(&headers);
    let columns = LookupColumns::resolve(&header_map)?;

    let mut entries = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| AppError::input(format!("Lookup CSV parse error: {e}")))?;
        let text = |idx: usize| {
            record
                .get(idx)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        if let Some(entry) = columns.entry_from(text) {
            entries.push(entry);
        }
    }
    Ok(entries)
}

/// Resolved column indexes of the lookup table.
struct LookupColumns {
    la_code: usize,
    la_name: Option<usize>,
    region_code: usize,
    region_name: usize,
}

impl LookupColumns {
    fn resolve(header_map: &HashMap<String, usize>) -> Result<Self, AppError> {
        let get = |key: &str, label: &str| {
            header_map.get(key).copied().ok_or_else(|| {
                AppError::input(format!("Region lookup is missing column `{label}`."))
            })
        };
        Ok(LookupColumns {
            la_code: get("lacode", "la_code")?,
            la_name: header_map.get("laname").copied(),
            region_code: get("regioncode", "region_code")?,
            region_name: get("regionname", "region_name")?,
        })
    }

    /// Build an entry from a cell accessor; rows with a blank key cell are
    /// skipped (the workbook has trailing notes under the table).
    fn entry_from(&self, text: impl Fn(usize) -> Option<String>) -> Option<RegionLookupEntry> {
        let la_code = text(self.la_code)?;
        let region_code = text(self.region_code)?;
        let region_name = text(self.region_name)?;
        let la_name = self.la_name.and_then(&text);
        Some(RegionLookupEntry {
            la_code,
            la_name,
            region_code,
            region_name,
        })
    }
}

fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty => return None,
        Data::String(s) => s.trim().to_string(),
        other => other.to_string().trim().to_string(),
    };
    if text.is_empty() { None } else { Some(text) }
}
