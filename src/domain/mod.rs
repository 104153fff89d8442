//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the region allow-list (`REGION_CODES`)
//! - raw and cleaned record types (`MortalityRow`, `CleanedRecord`)
//! - run configuration (`AnalysisConfig`)

pub mod types;

pub use types::*;
