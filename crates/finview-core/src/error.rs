//! Error types for finview-core

use thiserror::Error;

/// Core controller error type
#[derive(Error, Debug)]
pub enum CoreError {
    /// A filter referenced a field key missing from the catalog.
    /// The UI only offers catalog entries, so hitting this is a
    /// programming defect rather than a user-facing condition.
    #[error("Unknown filter field: {key}")]
    UnknownField { key: String },

    /// A date-time filter received input that cannot be coerced to
    /// the canonical timestamp format. The mutation is rejected and
    /// the stored value left unchanged.
    #[error("Invalid date-time value: {input}")]
    InvalidDateValue { input: String },

    /// The remote fetch failed; the previous result page is retained.
    #[error(transparent)]
    Fetch(#[from] finview_client::ApiError),
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;
