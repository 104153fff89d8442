//! Region resolution.
//!
//! Every raw row carries an area code that is either a local authority code or
//! already one of the nine region codes. Resolution is a single two-tier
//! lookup with self-fallback:
//!
//! 1. LA match: the area code is an LA in the lookup table
//! 2. region match: the area code appears as a region code in the lookup table
//! 3. self-fallback: keep the row's own code (the allow-list filter decides
//!    whether such a row survives)

use crate::io::lookup::RegionLookup;

/// Which tier resolved a row's region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionTier {
    LaMatch,
    RegionMatch,
    SelfFallback,
}

/// Resolved region for one row.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRegion {
    pub code: String,
    pub name: String,
    pub tier: RegionTier,
}

/// Resolve a row's region code and display name.
///
/// On self-fallback the name comes from the row's own area name when present,
/// else the code itself; the result is always total.
pub fn resolve_region(
    area_code: &str,
    area_name: Option<&str>,
    lookup: &RegionLookup,
) -> ResolvedRegion {
    if let Some((code, name)) = lookup.by_la(area_code) {
        return ResolvedRegion {
            code: code.to_string(),
            name: name.to_string(),
            tier: RegionTier::LaMatch,
        };
    }

    if let Some(name) = lookup.region_name(area_code) {
        return ResolvedRegion {
            code: area_code.to_string(),
            name: name.to_string(),
            tier: RegionTier::RegionMatch,
        };
    }

    ResolvedRegion {
        code: area_code.to_string(),
        name: area_name.unwrap_or(area_code).to_string(),
        tier: RegionTier::SelfFallback,
    }
}
