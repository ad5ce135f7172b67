//! Error types for the `domain` layer.
use std::error::Error as StdError;
use std::fmt;
use token_auth::error::{Error as TokenAuthError, ErrorKind as TokenAuthErrorKind};

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree structure
/// with `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums that represent the kinds of errors that can occur in the domain layer or
/// in lower layers. The `source` field is used to hold the original error that caused
/// the domain error. Callers such as the CLI or an HTTP layer map the `error_kind` to
/// their own user-visible outcome and never need to depend on `token_auth` directly.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    Token(TokenErrorKind),
}

/// Enum representing the various kinds of internal errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    Config,
    Other(String),
}

/// Security token failures, reduced to what a caller can act on.
#[derive(Debug, PartialEq)]
pub enum TokenErrorKind {
    /// Reject the request as unauthenticated.
    Invalid,
    /// No key material for the container; a server-side configuration or availability problem.
    KeyUnavailable,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "Domain Error: {:?}: {source}", self.error_kind),
            None => write!(f, "Domain Error: {:?}", self.error_kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// This is where we translate errors from the `token_auth` layer to the `domain` layer.
impl From<TokenAuthError> for Error {
    fn from(err: TokenAuthError) -> Self {
        let error_kind = match err.error_kind {
            TokenAuthErrorKind::InvalidToken => DomainErrorKind::Token(TokenErrorKind::Invalid),
            TokenAuthErrorKind::KeyUnavailable => {
                DomainErrorKind::Token(TokenErrorKind::KeyUnavailable)
            }
            TokenAuthErrorKind::Config => DomainErrorKind::Internal(InternalErrorKind::Config),
        };
        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}
