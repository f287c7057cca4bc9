//! Dashboard Error Types
//!
//! Errors from the lower crates are re-classified into what an HTTP client
//! can act on. [`ApiError`] turns them into a status code and a JSON body.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use derive_more::{Display, Error};
use serde::Serialize;
use vidtrend_history::error::Error as HistoryError;
use vidtrend_source::error::{Error as SourceError, ErrorKind as SourceErrorKind};
use vidtrend_sync::error::{Error as SyncError, ErrorKind as SyncErrorKind};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A query or form parameter is missing or not understood.
    #[display("invalid input: {_0}")]
    InvalidInput(#[error(not(source))] String),
    #[display("authentication failed: {_0}")]
    Authentication(#[error(not(source))] String),
    #[display("video source unavailable: {_0}")]
    SourceUnavailable(#[error(not(source))] String),
    #[display("malformed response from video source: {_0}")]
    MalformedResponse(#[error(not(source))] String),
    #[display("history storage error")]
    Storage,
    #[display("could not render page")]
    Template,
    /// The listener could not be bound or the server stopped unexpectedly.
    #[display("server error")]
    Server,
}

impl ErrorKind {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    fn from_source_kind(kind: &SourceErrorKind) -> Self {
        match kind {
            SourceErrorKind::Authentication(m) => Self::Authentication(m.clone()),
            SourceErrorKind::SourceUnavailable(m) => Self::SourceUnavailable(m.clone()),
            SourceErrorKind::MalformedResponse(m) => Self::MalformedResponse(m.clone()),
            SourceErrorKind::InvalidInput { .. } => Self::InvalidInput(kind.to_string()),
            SourceErrorKind::Client => Self::Server,
        }
    }

    #[track_caller]
    pub fn source(err: SourceError) -> Error {
        let kind = Self::from_source_kind(&err);
        err.raise(kind)
    }

    #[track_caller]
    pub fn history(err: HistoryError) -> Error {
        err.raise(Self::Storage)
    }

    #[track_caller]
    pub fn sync(err: SyncError) -> Error {
        let kind = match &*err {
            SyncErrorKind::Fetch(kind) => Self::from_source_kind(kind),
            SyncErrorKind::Record(_) => Self::Storage,
        };
        err.raise(kind)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Authentication(_) => StatusCode::UNAUTHORIZED,
            Self::SourceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
            Self::Storage | Self::Template | Self::Server => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable name used in JSON error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::Authentication(_) => "authentication",
            Self::SourceUnavailable(_) => "source_unavailable",
            Self::MalformedResponse(_) => "malformed_response",
            Self::Storage => "storage",
            Self::Template => "template",
            Self::Server => "server",
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

/// Handler error. Wraps the error tree so it can be logged in full while
/// only the top-level kind reaches the client.
#[derive(Debug)]
pub struct ApiError(pub Error);
impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}
impl From<ErrorKind> for ApiError {
    #[track_caller]
    fn from(kind: ErrorKind) -> Self {
        Self(exn::Exn::from(kind))
    }
}
impl ApiError {
    pub fn kind(&self) -> &ErrorKind {
        &self.0
    }
}
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let status = kind.status();
        if status.is_server_error() {
            tracing::error!(error = ?self.0, %status, "request failed");
        } else {
            tracing::warn!(error = %kind, %status, "request rejected");
        }
        let body = ErrorBody { error: kind.code(), message: kind.to_string() };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use vidtrend_history::error::ErrorKind as HistoryErrorKind;

    #[rstest]
    #[case(SourceErrorKind::Authentication("bad".into()), StatusCode::UNAUTHORIZED)]
    #[case(SourceErrorKind::SourceUnavailable("quota".into()), StatusCode::SERVICE_UNAVAILABLE)]
    #[case(SourceErrorKind::MalformedResponse("json".into()), StatusCode::BAD_GATEWAY)]
    #[case(SourceErrorKind::InvalidInput { field: "region", value: "XX".into() }, StatusCode::BAD_REQUEST)]
    #[case(SourceErrorKind::Client, StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_source_status(#[case] kind: SourceErrorKind, #[case] status: StatusCode) {
        let err = ErrorKind::source(exn::Exn::from(kind));
        assert_eq!(err.status(), status);
    }

    #[test]
    fn test_sync_record_is_storage() {
        let inner = exn::Exn::from(HistoryErrorKind::Constraint);
        let err = ErrorKind::sync(SyncErrorKind::record(inner));
        assert_eq!(*err, ErrorKind::Storage);
    }

    #[test]
    fn test_sync_fetch_keeps_source_kind() {
        let inner = exn::Exn::from(SourceErrorKind::Authentication("API key not valid".into()));
        let err = ErrorKind::sync(SyncErrorKind::fetch(inner));
        assert_eq!(*err, ErrorKind::Authentication("API key not valid".into()));
        assert_eq!(err.code(), "authentication");
    }
}
