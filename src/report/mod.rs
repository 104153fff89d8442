//! Run results in exportable form, plus terminal formatting.

pub mod format;

pub use format::*;

use serde::{Deserialize, Serialize};

use crate::aggregate::{RegionTotals, RegionYearTotals, SexRegionTotals, SexTotals};
use crate::clean::CleanReport;
use crate::domain::Disease;
use crate::stats::{GenderComparison, Histogram};

/// Everything one analysis run computes, minus the rendering.
///
/// This is what the JSON export serializes and what the debug bundle and
/// terminal report are formatted from. Chart grids are rebuilt on demand,
/// never stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub disease: Disease,
    pub rows_read: usize,
    pub clean: CleanReport,

    pub region_totals: Vec<RegionTotals>,
    pub sex_totals: Vec<SexTotals>,
    pub sex_region_totals: Vec<SexRegionTotals>,
    pub region_year_totals: Vec<RegionYearTotals>,

    /// (region, year) keys that had sums for only one gender.
    pub unpaired_keys: usize,
    /// Male minus female value sums per paired (region, year) key.
    pub differences: Vec<f64>,
    pub comparison: GenderComparison,

    /// Linearity of the normal probability plot, when the difference series
    /// was large enough to build one.
    pub probplot_r: Option<f64>,
    pub histogram: Option<Histogram>,
}
