use thiserror::Error;

/// Hard failures that abort report generation.
///
/// Metric gaps (missing growth/ACV, empty slices, zero denominators) are
/// recovered locally and never surface here.
#[derive(Debug, Error, PartialEq)]
pub enum InsightsError {
    #[error("record {index}: mandatory field '{field}' is empty")]
    InvalidRecord { index: usize, field: &'static str },

    #[error("no brand selected and no default brand configured")]
    NoBrandSelected,
}
