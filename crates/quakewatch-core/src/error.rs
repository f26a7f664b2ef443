use thiserror::Error;

/// Validation and contract errors exposed by `quakewatch-core`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("invalid sort key '{value}', expected one of time-desc, time-asc, mag-desc, mag-asc")]
    InvalidSortKey { value: String },

    #[error("invalid date '{value}', expected YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("invalid quick range '{value}', expected one of day, week, month")]
    InvalidQuickRange { value: String },

    #[error("magnitude range is inverted: min {min} > max {max}")]
    InvertedMagnitudeRange { min: f64, max: f64 },

    #[error("date range is inverted: start is after end")]
    InvertedDateRange,

    #[error("invalid feed name '{value}', expected one of cenc, usgs")]
    InvalidFeedName { value: String },
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
