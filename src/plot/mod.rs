//! Terminal charts.
//!
//! `ascii` owns the generic character-grid renderers; `charts` shapes the
//! analysis outputs into them.

pub mod ascii;
pub mod charts;

pub use ascii::*;
pub use charts::*;
