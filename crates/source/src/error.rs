//! Source Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A source error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for source operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The credential is missing, malformed, expired or was refused. Ask the
    /// user for a different one.
    #[display("authentication failed: {_0}")]
    Authentication(#[error(not(source))] String),
    /// Network failure, quota exhausted, rate limited or the platform is
    /// having a bad day. Try again later.
    #[display("video source unavailable: {_0}")]
    SourceUnavailable(#[error(not(source))] String),
    /// The platform answered, but not with anything we understand.
    #[display("malformed response from video source: {_0}")]
    MalformedResponse(#[error(not(source))] String),
    /// A region, category or other argument is not one we support. Fix the
    /// input; no request was made.
    #[display("invalid {field}: {value}")]
    InvalidInput {
        /// Which argument was rejected.
        field: &'static str,
        /// The rejected value, as given.
        value: String,
    },
    /// The HTTP client could not be constructed.
    #[display("could not initialise HTTP client")]
    Client,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::SourceUnavailable(_))
    }

    pub(crate) fn invalid(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidInput { field, value: value.into() }
    }
}
