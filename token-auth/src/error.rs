//! Error types for the `token-auth` crate.
//!
//! Follows the same pattern as domain::error with a root Error struct and an error kind enum.
//! Every decode failure collapses into `ErrorKind::InvalidToken` so callers cannot tell a bad
//! signature from a bad ciphertext or an expired token. `InvalidToken` errors carry no source;
//! the finer grained reason and message are crate-private and only reach server-side logs.

use std::error::Error as StdError;
use std::fmt;

/// Top-level error type for token-auth crate.
/// Holds error kind and optional source for error chaining.
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
    pub(crate) reason: Option<InvalidTokenReason>,
    pub(crate) detail: Option<String>,
}

/// Categories of errors reported to callers of the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The token could not be created or accepted.
    InvalidToken,
    /// No key material is configured for the container.
    KeyUnavailable,
    /// Key or TTL configuration entries could not be parsed.
    Config,
}

/// Diagnostic detail behind an `InvalidToken` error. Never rendered to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InvalidTokenReason {
    MissingToken,
    Malformed,
    UnsupportedVersion,
    Unauthenticated,
    ContainerMismatch,
    Expired,
    NotYetValid,
    MissingClaim,
    InvalidActiveUrl,
    Serialization,
}

impl Error {
    /// The diagnostic reason, for logging inside this crate.
    pub(crate) fn reason(&self) -> Option<InvalidTokenReason> {
        self.reason
    }

    /// Diagnostic message, for logging inside this crate.
    pub(crate) fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

// Reason and detail stay out of Debug output as well.
impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Error")
            .field("error_kind", &self.error_kind)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_kind {
            ErrorKind::InvalidToken => write!(f, "Invalid security token"),
            ErrorKind::KeyUnavailable => write!(f, "Security token key unavailable"),
            ErrorKind::Config => match &self.source {
                Some(source) => write!(f, "Security token configuration error: {source}"),
                None => write!(f, "Security token configuration error"),
            },
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

/// Helper function to create invalid token errors.
///
/// The message is kept as crate-private detail for server-side diagnostics only.
pub(crate) fn invalid_token(reason: InvalidTokenReason, message: &str) -> Error {
    Error {
        source: None,
        error_kind: ErrorKind::InvalidToken,
        reason: Some(reason),
        detail: Some(message.to_string()),
    }
}

/// Helper function to create key unavailable errors.
pub fn key_unavailable(container: &str) -> Error {
    Error {
        source: Some(format!("No key material for container: {container}").into()),
        error_kind: ErrorKind::KeyUnavailable,
        reason: None,
        detail: None,
    }
}

/// Helper function to create configuration errors.
pub(crate) fn config_error(message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::Config,
        reason: None,
        detail: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_token_display_is_generic() {
        let expired = invalid_token(InvalidTokenReason::Expired, "token expired 10s ago");
        let forged = invalid_token(InvalidTokenReason::Unauthenticated, "tag mismatch");

        assert_eq!(expired.to_string(), forged.to_string());
        assert_eq!(expired.to_string(), "Invalid security token");
    }

    #[test]
    fn test_invalid_token_has_no_source_chain() {
        let expired = invalid_token(InvalidTokenReason::Expired, "token expired 10s ago");
        assert!(expired.source().is_none());
        assert_eq!(expired.detail(), Some("token expired 10s ago"));
    }

    #[test]
    fn test_reason_is_recorded() {
        let err = invalid_token(InvalidTokenReason::Malformed, "bad");
        assert_eq!(err.error_kind, ErrorKind::InvalidToken);
        assert_eq!(err.reason(), Some(InvalidTokenReason::Malformed));
    }

    #[test]
    fn test_key_unavailable_does_not_expose_reason() {
        let err = key_unavailable("acme");
        assert_eq!(err.error_kind, ErrorKind::KeyUnavailable);
        assert!(err.reason().is_none());
        assert!(err.source().is_some());
    }

    #[test]
    fn test_config_error_display_includes_message() {
        let err = config_error("bad entry");
        assert_eq!(
            err.to_string(),
            "Security token configuration error: bad entry"
        );
    }
}
