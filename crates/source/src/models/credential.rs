use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::error::{Error, ErrorKind};

/// An API access token for the video platform.
///
/// Guaranteed non-empty (after trimming). Never printed: both [`Debug`] and
/// [`Display`] are redacted so that it can't leak into logs by accident.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);
impl Credential {
    pub fn new(token: impl AsRef<str>) -> Result<Self, Error> {
        let token = token.as_ref().trim();
        if token.is_empty() {
            exn::bail!(ErrorKind::Authentication("no API key provided".to_string()));
        }
        Ok(Self(token.to_string()))
    }

    /// The raw token, for building requests. Don't log this.
    pub fn expose(&self) -> &str {
        &self.0
    }
}
impl FromStr for Credential {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
impl TryFrom<String> for Credential {
    type Error = Error;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("Credential(****)")
    }
}
impl Display for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("****")
    }
}
