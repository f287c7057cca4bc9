//! Sync Error Types
//!
//! Both kinds carry the failing component's own kind so callers can decide
//! what to tell the user without walking the error tree.

use derive_more::{Display, Error};
use vidtrend_history::error::{Error as HistoryError, ErrorKind as HistoryErrorKind};
use vidtrend_source::error::{Error as SourceError, ErrorKind as SourceErrorKind};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Nothing was fetched, so nothing was written.
    #[display("fetch failed: {_0}")]
    Fetch(SourceErrorKind),
    #[display("recording failed: {_0}")]
    Record(HistoryErrorKind),
}
impl ErrorKind {
    /// Wrap a source error, keeping its frame as a child in the tree.
    #[track_caller]
    pub fn fetch(err: SourceError) -> Error {
        let inner = (*err).clone();
        err.raise(ErrorKind::Fetch(inner))
    }

    #[track_caller]
    pub fn record(err: HistoryError) -> Error {
        let inner = (*err).clone();
        err.raise(ErrorKind::Record(inner))
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Fetch(kind) => kind.is_retryable(),
            Self::Record(kind) => kind.is_retryable(),
        }
    }
}
