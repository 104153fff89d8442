//! Seeded demo data for file-free runs.

pub mod sample;

pub use sample::{demo_lookup, demo_rows};
