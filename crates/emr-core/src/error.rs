//! Error types for EMR record processing

use thiserror::Error;

/// Result type alias for emr-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type shared across the survival-data pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// A record failed to parse: wrong field count, bad date, bad id, bad JSON.
    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    /// An operation required the `(bx, dob)` fact and it was absent.
    ///
    /// Callers that can proceed without a DOB (the study-period clipper)
    /// should match on this variant and fall back rather than propagate it.
    #[error("missing date of birth fact (bx, dob)")]
    MissingDob,

    /// A record's id compared less than the previously seen id. The input
    /// is assumed non-decreasing in id; this is fatal to the stream.
    #[error("out-of-order input at line {line}: id {id} follows id {prev_id}")]
    OutOfOrderInput { prev_id: i64, id: i64, line: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Build a [`Error::MalformedRecord`] with the given line and reason.
    pub fn malformed<S: Into<String>>(line: usize, reason: S) -> Self {
        Error::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }
}
