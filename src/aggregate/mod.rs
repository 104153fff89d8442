//! Group-by reductions over cleaned records.
//!
//! All aggregations are pure sums with deterministic key order (BTreeMap
//! iteration), so repeated runs over the same records produce identical
//! tables. The paired male/female series used by the normality diagnostics is
//! built here as well: values are joined on the (region name, year) key, and
//! keys present for only one gender are skipped and counted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{CleanedRecord, Sex};

/// Value and CI sums for one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionTotals {
    pub region_name: String,
    pub value: f64,
    pub lower_ci: f64,
    pub upper_ci: f64,
}

/// Value sum for one sex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SexTotals {
    pub sex: Sex,
    pub value: f64,
}

/// Value sum for one (sex, region) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SexRegionTotals {
    pub sex: Sex,
    pub region_name: String,
    pub value: f64,
}

/// Value sum for one (region, year) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionYearTotals {
    pub region_name: String,
    pub year: String,
    pub value: f64,
}

/// Sum Value and both CI bounds by region name.
pub fn sum_by_region(records: &[CleanedRecord]) -> Vec<RegionTotals> {
    let mut sums: BTreeMap<&str, (f64, f64, f64)> = BTreeMap::new();
    for r in records {
        let entry = sums.entry(&r.region_name).or_insert((0.0, 0.0, 0.0));
        entry.0 += r.value;
        entry.1 += r.lower_ci;
        entry.2 += r.upper_ci;
    }
    sums.into_iter()
        .map(|(region_name, (value, lower_ci, upper_ci))| RegionTotals {
            region_name: region_name.to_string(),
            value,
            lower_ci,
            upper_ci,
        })
        .collect()
}

/// Sum Value by sex.
pub fn sum_by_sex(records: &[CleanedRecord]) -> Vec<SexTotals> {
    let mut sums: BTreeMap<Sex, f64> = BTreeMap::new();
    for r in records {
        *sums.entry(r.sex).or_insert(0.0) += r.value;
    }
    sums.into_iter()
        .map(|(sex, value)| SexTotals { sex, value })
        .collect()
}

/// Sum Value by (sex, region name).
pub fn sum_by_sex_region(records: &[CleanedRecord]) -> Vec<SexRegionTotals> {
    let mut sums: BTreeMap<(Sex, &str), f64> = BTreeMap::new();
    for r in records {
        *sums.entry((r.sex, &r.region_name)).or_insert(0.0) += r.value;
    }
    sums.into_iter()
        .map(|((sex, region_name), value)| SexRegionTotals {
            sex,
            region_name: region_name.to_string(),
            value,
        })
        .collect()
}

/// Sum Value by (region name, year).
pub fn sum_by_region_year(records: &[CleanedRecord]) -> Vec<RegionYearTotals> {
    let mut sums: BTreeMap<(&str, &str), f64> = BTreeMap::new();
    for r in records {
        *sums.entry((&r.region_name, &r.year)).or_insert(0.0) += r.value;
    }
    sums.into_iter()
        .map(|((region_name, year), value)| RegionYearTotals {
            region_name: region_name.to_string(),
            year: year.to_string(),
            value,
        })
        .collect()
}

/// Male and female value sums for one (region, year) key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenderPair {
    pub region_name: String,
    pub year: String,
    pub male: f64,
    pub female: f64,
}

/// Paired gender sums plus the count of keys that had only one gender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenderPairs {
    pub pairs: Vec<GenderPair>,
    pub unpaired: usize,
}

/// Join male and female value sums on the (region name, year) key.
///
/// Keys observed for exactly one gender cannot form a difference and are
/// skipped; `unpaired` reports how many.
pub fn paired_gender_sums(records: &[CleanedRecord]) -> GenderPairs {
    let mut sums: BTreeMap<(&str, &str), (Option<f64>, Option<f64>)> = BTreeMap::new();
    for r in records {
        let entry = sums
            .entry((&r.region_name, &r.year))
            .or_insert((None, None));
        match r.sex {
            Sex::Male => *entry.0.get_or_insert(0.0) += r.value,
            Sex::Female => *entry.1.get_or_insert(0.0) += r.value,
            Sex::Persons => {}
        }
    }

    let mut pairs = Vec::new();
    let mut unpaired = 0usize;
    for ((region_name, year), sums) in sums {
        match sums {
            (Some(male), Some(female)) => pairs.push(GenderPair {
                region_name: region_name.to_string(),
                year: year.to_string(),
                male,
                female,
            }),
            _ => unpaired += 1,
        }
    }

    GenderPairs { pairs, unpaired }
}

/// Per-key male minus female differences, in key order.
pub fn difference_series(pairs: &[GenderPair]) -> Vec<f64> {
    pairs.iter().map(|p| p.male - p.female).collect()
}
