//! Synthetic demo dataset generation.
//!
//! `phof demo` runs the full pipeline without any input files, over rows
//! shaped like the published mortality datasets: LA-coded and region-coded
//! area codes, pooled three-year time periods, a Persons series, England-level
//! rows, and occasional missing numbers. Everything is seeded, so a fixed
//! seed reproduces the run exactly.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{MortalityRow, REGION_CODES, RegionLookupEntry, Sex};
use crate::error::AppError;
use crate::io::lookup::RegionLookup;

/// Region names aligned index-for-index with [`REGION_CODES`].
const REGION_NAMES: [&str; 9] = [
    "North East",
    "North West",
    "Yorkshire and The Humber",
    "East Midlands",
    "West Midlands",
    "East of England",
    "London",
    "South East",
    "South West",
];

/// First demo year; ten yearly pooled periods follow.
const FIRST_YEAR: i32 = 2001;
const YEARS: i32 = 10;

/// Build the demo lookup table: two local authorities per region.
///
/// The last region (South West) is left out on purpose. Its rows carry the
/// region code directly and resolve through the self-fallback tier, which
/// keeps that path exercised end to end.
pub fn demo_lookup() -> RegionLookup {
    let mut entries = Vec::new();
    for (i, code) in REGION_CODES.iter().enumerate().take(REGION_CODES.len() - 1) {
        for j in 1..=2 {
            entries.push(RegionLookupEntry {
                la_code: demo_la_code(i, j),
                la_name: Some(format!("{} district {j}", REGION_NAMES[i])),
                region_code: code.to_string(),
                region_name: REGION_NAMES[i].to_string(),
            });
        }
    }
    RegionLookup::from_entries(entries)
}

/// Generate the demo mortality rows for one dataset.
///
/// Per region and pooled year the output holds a Male, Female and Persons
/// row; male rates sit well above female rates so the gender comparison has
/// a clear signal. On top of the clean rows there are England-level rows
/// (dropped by the region filter) and one over-long pooled period per region
/// (dropped by the period filter).
pub fn demo_rows(seed: u64) -> Result<Vec<MortalityRow>, AppError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 0.8)
        .map_err(|e| AppError::internal(format!("Noise distribution error: {e}")))?;
    let ci_noise: Normal<f64> = Normal::new(0.0, 0.2)
        .map_err(|e| AppError::internal(format!("Noise distribution error: {e}")))?;

    let mut rows = Vec::new();
    let mut serial = 0usize;

    for (i, region_code) in REGION_CODES.iter().enumerate() {
        let in_lookup = i < REGION_CODES.len() - 1;
        let male_base = 13.0 + i as f64 * 0.8;
        let female_base = 6.0 + i as f64 * 0.4;

        for year_off in 0..YEARS {
            let year = FIRST_YEAR + year_off;
            let trend = -0.15 * year_off as f64;
            let period = demo_period(year);

            for sex in [Sex::Male, Sex::Female, Sex::Persons] {
                let base = match sex {
                    Sex::Male => male_base,
                    Sex::Female => female_base,
                    Sex::Persons => (male_base + female_base) / 2.0,
                };
                let value = base + trend + noise.sample(&mut rng);
                let spread = 1.0 + ci_noise.sample(&mut rng).abs();

                // Alternate between the region's LAs; every fifth row uses
                // the region code itself. Regions missing from the lookup
                // are always region-coded.
                let (area_code, area_name) = if !in_lookup || serial % 5 == 4 {
                    (region_code.to_string(), Some(REGION_NAMES[i].to_string()))
                } else {
                    let j = 1 + serial % 2;
                    (
                        demo_la_code(i, j),
                        Some(format!("{} district {j}", REGION_NAMES[i])),
                    )
                };

                rows.push(MortalityRow {
                    area_code,
                    area_name,
                    time_period: period.clone(),
                    sex,
                    value: skip_every(serial, 13, value),
                    lower_ci: skip_every(serial, 11, value - spread),
                    upper_ci: skip_every(serial, 7, value + spread),
                    category_type: None,
                    category: None,
                    age: None,
                    count: None,
                    denominator: None,
                    value_note: None,
                });
                serial += 1;
            }
        }

        // One over-long pooled period per region, dropped in cleaning.
        rows.push(plain_row(
            region_code,
            REGION_NAMES[i],
            &demo_period(FIRST_YEAR + YEARS),
            male_base + noise.sample(&mut rng),
        ));
    }

    // England-level rows: resolved by fallback, then dropped by the
    // nine-region filter.
    for year_off in 0..YEARS {
        rows.push(plain_row(
            "E92000001",
            "England",
            &demo_period(FIRST_YEAR + year_off),
            12.0 + noise.sample(&mut rng),
        ));
    }

    Ok(rows)
}

fn demo_la_code(region_idx: usize, j: usize) -> String {
    format!("E060{:02}{:03}", region_idx + 1, j)
}

/// Pooled period label, e.g. 2001 -> "2001 - 03".
fn demo_period(year: i32) -> String {
    format!("{year} - {:02}", (year + 2) % 100)
}

fn skip_every(serial: usize, step: usize, value: f64) -> Option<f64> {
    if serial % step == step - 1 {
        None
    } else {
        Some(value)
    }
}

fn plain_row(area_code: &str, area_name: &str, period: &str, value: f64) -> MortalityRow {
    MortalityRow {
        area_code: area_code.to_string(),
        area_name: Some(area_name.to_string()),
        time_period: period.to_string(),
        sex: Sex::Male,
        value: Some(value),
        lower_ci: Some(value - 1.0),
        upper_ci: Some(value + 1.0),
        category_type: None,
        category: None,
        age: None,
        count: None,
        denominator: None,
        value_note: None,
    }
}
