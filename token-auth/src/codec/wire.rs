//! Outer structure of a wire token: `<version>.<base64url(container)>.<base64url(body)>`.
//!
//! Nothing parsed here is trusted until the crypter has authenticated the body against the
//! header.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64, Engine};

use crate::error::{invalid_token, Error, InvalidTokenReason};

const SEPARATOR: char = '.';

/// A structurally valid, not yet authenticated wire token.
#[derive(Debug)]
pub(crate) struct WireToken<'a> {
    pub(crate) version: &'a str,
    pub(crate) container: String,
    /// `<version>.<base64url(container)>` exactly as it appeared on the wire.
    pub(crate) header: &'a str,
    pub(crate) body: Vec<u8>,
}

/// The authenticated header for `container` under `version`.
pub(crate) fn header(version: &str, container: &str) -> String {
    format!("{version}{SEPARATOR}{}", BASE64.encode(container))
}

/// Join a header and a sealed body into a wire token.
pub(crate) fn format(header: &str, body: &[u8]) -> String {
    format!("{header}{SEPARATOR}{}", BASE64.encode(body))
}

/// Split a wire token into its parts, rejecting anything that is not exactly three non-empty
/// segments or whose version is not `expected_version`.
pub(crate) fn parse<'a>(token: &'a str, expected_version: &str) -> Result<WireToken<'a>, Error> {
    let mut parts = token.split(SEPARATOR);
    let (version, container_b64, body_b64) = match (parts.next(), parts.next(), parts.next()) {
        (Some(v), Some(c), Some(b)) if parts.next().is_none() => (v, c, b),
        _ => {
            return Err(invalid_token(
                InvalidTokenReason::Malformed,
                "Token must have exactly three segments",
            ))
        }
    };

    if version != expected_version {
        return Err(invalid_token(
            InvalidTokenReason::UnsupportedVersion,
            &format!("Unsupported token version: {version}"),
        ));
    }
    if container_b64.is_empty() || body_b64.is_empty() {
        return Err(invalid_token(
            InvalidTokenReason::Malformed,
            "Token has an empty segment",
        ));
    }

    let container = BASE64
        .decode(container_b64)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .filter(|container| !container.trim().is_empty())
        .ok_or_else(|| {
            invalid_token(
                InvalidTokenReason::Malformed,
                "Token container segment is not valid",
            )
        })?;

    let body = BASE64.decode(body_b64).map_err(|e| {
        invalid_token(
            InvalidTokenReason::Malformed,
            &format!("Token body is not base64url: {e}"),
        )
    })?;

    let header = &token[..version.len() + 1 + container_b64.len()];

    Ok(WireToken {
        version,
        container,
        header,
        body,
    })
}
