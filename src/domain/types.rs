//! Shared domain types.
//!
//! These types are intentionally lightweight and (where exported) serializable
//! so they can be:
//!
//! - carried through the cleaning pipeline in-memory
//! - exported to CSV/JSON
//! - compared directly in tests

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// The nine English government office region codes.
///
/// Cleaned records are restricted to exactly this set; any row whose resolved
/// region code falls outside it is dropped.
pub const REGION_CODES: [&str; 9] = [
    "E12000001",
    "E12000002",
    "E12000003",
    "E12000004",
    "E12000005",
    "E12000006",
    "E12000007",
    "E12000008",
    "E12000009",
];

/// True if `code` is one of the nine region codes.
pub fn is_region_code(code: &str) -> bool {
    REGION_CODES.contains(&code)
}

/// Sex as recorded in the source datasets.
///
/// `Persons` (the combined series) is carried through ingest so the cleaning
/// stage can drop and count it; it never appears in cleaned output.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Sex {
    Male,
    Female,
    Persons,
}

impl Sex {
    /// Parse the dataset's `Sex` column (case-insensitive, trimmed).
    pub fn parse(s: &str) -> Option<Sex> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("male") {
            Some(Sex::Male)
        } else if s.eq_ignore_ascii_case("female") {
            Some(Sex::Female)
        } else if s.eq_ignore_ascii_case("persons") {
            Some(Sex::Persons)
        } else {
            None
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
            Sex::Persons => "Persons",
        }
    }
}

/// Which mortality dataset to analyze.
///
/// Each variant maps to one of the published indicator files; all five share
/// the same column schema and cleaning rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Disease {
    Suicide,
    Cancer,
    Liver,
    Respiratory,
    Cardiovascular,
}

impl Disease {
    pub const ALL: [Disease; 5] = [
        Disease::Suicide,
        Disease::Cancer,
        Disease::Liver,
        Disease::Respiratory,
        Disease::Cardiovascular,
    ];

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            Disease::Suicide => "suicide",
            Disease::Cancer => "cancer",
            Disease::Liver => "liver disease",
            Disease::Respiratory => "respiratory disease",
            Disease::Cardiovascular => "cardiovascular disease",
        }
    }

    /// Short single-word name, used in CLI values and generated file names.
    pub fn slug(self) -> &'static str {
        match self {
            Disease::Suicide => "suicide",
            Disease::Cancer => "cancer",
            Disease::Liver => "liver",
            Disease::Respiratory => "respiratory",
            Disease::Cardiovascular => "cardiovascular",
        }
    }

    /// File name of the published dataset, as distributed.
    pub fn default_file_name(self) -> &'static str {
        match self {
            Disease::Suicide => "410suiciderate.data.csv",
            Disease::Cancer => {
                "405iiunder75mortalityratefromcancerconsideredpreventable.data.csv"
            }
            Disease::Liver => {
                "406iiunder75mortalityratefromliverdiseaseconsideredpreventable.data.csv"
            }
            Disease::Respiratory => {
                "407iiunder75mortalityratefromrespiratorydiseaseconsideredpreventable.data.csv"
            }
            Disease::Cardiovascular => {
                "404iiunder75mortalityratefromcardiovasculardiseasesconsideredpreventable.data.csv"
            }
        }
    }
}

/// Default file name of the LA-to-region lookup workbook, as distributed.
pub const DEFAULT_LOOKUP_FILE: &str = "laregionlookup2012_tcm77-368555.xls";

/// Default worksheet holding the lookup table.
pub const DEFAULT_LOOKUP_SHEET: &str = "LA_region_2012";

/// A raw dataset row (mostly optional).
///
/// Mirrors the published column set closely enough for row-level validation
/// with good error messages. Numeric columns stay `Option` until the
/// imputation stage decides how to fill them.
#[derive(Debug, Clone, PartialEq)]
pub struct MortalityRow {
    pub area_code: String,
    pub area_name: Option<String>,
    pub time_period: String,
    pub sex: Sex,

    pub value: Option<f64>,
    pub lower_ci: Option<f64>,
    pub upper_ci: Option<f64>,

    pub category_type: Option<String>,
    pub category: Option<String>,
    pub age: Option<String>,
    pub count: Option<f64>,
    pub denominator: Option<f64>,
    pub value_note: Option<String>,
}

/// One row of the LA-to-region lookup table.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionLookupEntry {
    pub la_code: String,
    pub la_name: Option<String>,
    pub region_code: String,
    pub region_name: String,
}

/// A fully cleaned observation: region resolved, sex binary, period parsed,
/// no missing numbers left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedRecord {
    pub region_code: String,
    pub region_name: String,
    pub sex: Sex,
    /// Prefix of the raw time period before the first '-'. Kept as text: the
    /// published periods are pooled ranges ("2001 - 03"), not calendar years.
    pub year: String,
    pub value: f64,
    pub lower_ci: f64,
    pub upper_ci: f64,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub disease: Disease,
    pub data_dir: PathBuf,
    pub data_file: Option<PathBuf>,
    pub lookup_file: Option<PathBuf>,
    pub lookup_sheet: String,

    pub charts: bool,
    pub chart_width: usize,
    pub chart_height: usize,
    pub hist_bins: usize,

    pub export_cleaned: Option<PathBuf>,
    pub export_report: Option<PathBuf>,
    pub debug_bundle: bool,
}

impl AnalysisConfig {
    /// Path of the dataset CSV: explicit override, or the published file name
    /// under the data directory.
    pub fn data_path(&self) -> PathBuf {
        self.data_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join(self.disease.default_file_name()))
    }

    /// Path of the region lookup workbook (or CSV export of it).
    pub fn lookup_path(&self) -> PathBuf {
        self.lookup_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join(DEFAULT_LOOKUP_FILE))
    }
}
