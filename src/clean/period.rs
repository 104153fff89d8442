//! Time-period parsing.
//!
//! The `Time period` column mixes two encodings: month-year values ("Jan-09")
//! and pooled year ranges ("2001 - 03"). Both split on the first '-'; the
//! remainder doubles as the filter: a row is dropped when the remainder is
//! non-numeric or greater than 12. The surviving prefix becomes the `Year`
//! grouping key; the remainder is an intermediate and never reaches output.
//!
//! Note the asymmetry this rule inherits: "2010 - 12" survives (remainder 12)
//! while "2011 - 13" does not. The filter is applied as specified rather than
//! second-guessed, so cleaned output agrees with the published analysis.

/// Successfully split time period.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitPeriod {
    pub year: String,
    pub month: f64,
}

/// Split a raw time period; `None` means the row must be dropped.
pub fn parse_time_period(raw: &str) -> Option<SplitPeriod> {
    let (prefix, remainder) = raw.split_once('-')?;
    let month: f64 = remainder.trim().parse().ok()?;
    if !(month <= 12.0) {
        return None;
    }
    Some(SplitPeriod {
        year: prefix.trim().to_string(),
        month,
    })
}
