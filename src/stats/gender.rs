//! Gender split and the male/female rate comparison.

use serde::{Deserialize, Serialize};

use crate::domain::{CleanedRecord, Sex};
use crate::error::AppError;
use crate::stats::describe::{SampleSummary, summarize};
use crate::stats::ttest::{TTestResult, students_t_test};

/// Descriptives for each gender, the combined sample, and the test itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenderComparison {
    pub male: SampleSummary,
    pub female: SampleSummary,
    pub combined: SampleSummary,
    pub test: TTestResult,
}

/// Extract the Value sequences per gender, preserving record order.
pub fn split_by_sex(records: &[CleanedRecord]) -> (Vec<f64>, Vec<f64>) {
    let mut male = Vec::new();
    let mut female = Vec::new();
    for r in records {
        match r.sex {
            Sex::Male => male.push(r.value),
            Sex::Female => female.push(r.value),
            Sex::Persons => {}
        }
    }
    (male, female)
}

/// Compare mortality values between the genders.
///
/// Each group needs at least two observations; anything less is a no-data
/// condition, not an internal failure.
pub fn compare_by_gender(records: &[CleanedRecord]) -> Result<GenderComparison, AppError> {
    let (male, female) = split_by_sex(records);
    if male.len() < 2 || female.len() < 2 {
        return Err(AppError::no_data(format!(
            "need at least 2 rows per gender after cleaning, got {} male and {} female",
            male.len(),
            female.len()
        )));
    }

    let mut combined = Vec::with_capacity(male.len() + female.len());
    combined.extend_from_slice(&male);
    combined.extend_from_slice(&female);

    Ok(GenderComparison {
        male: summarize(Sex::Male.label(), &male)?,
        female: summarize(Sex::Female.label(), &female)?,
        combined: summarize("Combined", &combined)?,
        test: students_t_test(&male, &female)?,
    })
}
