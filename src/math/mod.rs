//! Numeric building blocks shared by the statistics and plotting layers.

pub mod ols;

pub use ols::*;
