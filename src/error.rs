//! Command-line Error Types

use derive_more::{Display, Error};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[display("could not load configuration")]
    Config,
    #[display("could not open history database")]
    Database,
    #[display("could not read history")]
    History,
    #[display("could not set up the video source")]
    Source,
    /// No `--api-key` and none configured.
    #[display("no API key: pass --api-key or set source.api_key")]
    MissingCredential,
    #[display("API key check failed")]
    Verify,
    #[display("refresh failed")]
    Refresh,
    #[display("dashboard failed")]
    Server,
    #[display("invalid {_0}")]
    Input(#[error(not(source))] &'static str),
}
