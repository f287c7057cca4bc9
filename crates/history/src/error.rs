//! History Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A history error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for history operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The database could not be opened, read or written.
    #[display("database error")]
    Database,
    #[display("database migration error")]
    Migration,
    /// A batch would have stored the same video twice for one observation.
    #[display("duplicate snapshot in batch")]
    Constraint,
    /// A value could not be converted to or from its stored form.
    #[display("invalid history data: {_0}")]
    InvalidData(#[error(not(source))] &'static str),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
