use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CredentialError {
    /// The named credential was absent or blank
    #[error("{0} is not provided")]
    Missing(String),
}

/// Access token used to authenticate against the comment platform.
///
/// A `Credential` is never empty: construction fails for blank input, which lets
/// callers reject a missing token before any remote call is made.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Build a credential from raw input, naming `key` in the error when it is blank.
    pub fn new(key: &str, raw: Option<&str>) -> Result<Self, CredentialError> {
        match raw.map(str::trim) {
            Some(token) if !token.is_empty() => Ok(Self(token.to_string())),
            _ => Err(CredentialError::Missing(key.to_string())),
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}
