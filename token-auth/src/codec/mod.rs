//! Encoding and verification of gadget security tokens.

mod blob;
mod wire;

pub use blob::BlobCrypterCodec;

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::claims::ClaimSet;
use crate::error::Error;

/// The security token value must be passed in the parameter map under this key.
pub const SECURITY_TOKEN_NAME: &str = "token";

/// Active URL for the request. Must include protocol, host and port; may include path and
/// query.
pub const ACTIVE_URL_NAME: &str = "activeUrl";

/// The configuration parameter for security token time-to-lives.
pub const SECURITY_TOKEN_TTL_CONFIG: &str = "gadgets.securityTokenTTL";

/// Caller supplied parameters for decoding. Must contain [`SECURITY_TOKEN_NAME`].
pub type TokenParameters = HashMap<String, String>;

/// Handles creation and verification of gadget security tokens.
pub trait SecurityTokenCodec: Send + Sync {
    /// Decrypts and verifies the token in `parameters` as of `now`.
    fn create_token_at(
        &self,
        parameters: &TokenParameters,
        now: DateTime<Utc>,
    ) -> Result<ClaimSet, Error>;

    /// Encodes `claims` into a wire token, stamping `now` as the issue time if the claims have
    /// never been encoded before.
    fn encode_token_at(&self, claims: &ClaimSet, now: DateTime<Utc>) -> Result<String, Error>;

    /// How long a token minted for `container` lives, in seconds.
    fn token_time_to_live(&self, container: &str) -> u32;

    /// Decrypts and verifies a token to return its claims.
    fn create_token(&self, parameters: &TokenParameters) -> Result<ClaimSet, Error> {
        self.create_token_at(parameters, Utc::now())
    }

    fn encode_token(&self, claims: &ClaimSet) -> Result<String, Error> {
        self.encode_token_at(claims, Utc::now())
    }
}
