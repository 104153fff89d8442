//! Input/output helpers.
//!
//! - dataset CSV ingest + validation (`ingest`)
//! - region lookup ingest, workbook or CSV (`lookup`)
//! - result exports, CSV/JSON (`export`)

pub mod export;
pub mod ingest;
pub mod lookup;

pub use export::*;
pub use ingest::*;
pub use lookup::*;
