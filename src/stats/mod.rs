//! Descriptive and inferential statistics over cleaned records.

pub mod describe;
pub mod gender;
pub mod probplot;
pub mod ttest;

pub use describe::{SampleSummary, mean, pearson_r, sample_sd, summarize};
pub use gender::{GenderComparison, compare_by_gender, split_by_sex};
pub use probplot::{Histogram, ProbabilityPlot, histogram, probability_plot, uniform_order_medians};
pub use ttest::{TTestResult, students_t_test};
