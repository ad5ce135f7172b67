//! Security token codec backed by a [`BlobCrypter`].
//!
//! The container named in the token header selects the key material and the TTL. The header
//! is authenticated together with the payload, and the payload must name the same container,
//! so a token minted for one container can never be validated under another container's key.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::*;

use super::{wire, SecurityTokenCodec, TokenParameters, ACTIVE_URL_NAME, SECURITY_TOKEN_NAME};
use crate::claims::{validate_active_url, ClaimSet, Payload};
use crate::crypter::{AesGcmCrypter, BlobCrypter, HmacCrypter};
use crate::error::{invalid_token, key_unavailable, Error, ErrorKind, InvalidTokenReason};
use crate::keys::KeyProvider;
use crate::snapshot::SnapshotSource;
use crate::ttl::TtlPolicy;

/// Stateless token codec. Safe to share across threads. Each call reads keys and TTLs from a
/// single configuration snapshot.
pub struct BlobCrypterCodec {
    crypter: Box<dyn BlobCrypter>,
    config: Arc<SnapshotSource>,
    clock_skew_secs: u32,
}

impl BlobCrypterCodec {
    pub fn new(crypter: impl BlobCrypter + 'static, config: Arc<SnapshotSource>) -> Self {
        Self {
            crypter: Box::new(crypter),
            config,
            clock_skew_secs: 0,
        }
    }

    /// Codec whose tokens are encrypted and authenticated with AES-256-GCM.
    pub fn encrypted(config: Arc<SnapshotSource>) -> Self {
        Self::new(AesGcmCrypter, config)
    }

    /// Codec whose tokens are signed with HMAC-SHA256 but readable by the bearer.
    pub fn signed(config: Arc<SnapshotSource>) -> Self {
        Self::new(HmacCrypter, config)
    }

    /// Leeway in seconds applied to expiry and issue time checks. Defaults to zero.
    pub fn with_clock_skew_secs(mut self, clock_skew_secs: u32) -> Self {
        self.clock_skew_secs = clock_skew_secs;
        self
    }

    fn decode(&self, parameters: &TokenParameters, now: DateTime<Utc>) -> Result<ClaimSet, Error> {
        let token = parameters
            .get(SECURITY_TOKEN_NAME)
            .map(|token| token.trim())
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                invalid_token(InvalidTokenReason::MissingToken, "No security token provided")
            })?;

        let wire = wire::parse(token, self.crypter.version())?;

        let config = self.config.snapshot();
        let key = config
            .keys()
            .key_for(&wire.container)?
            .ok_or_else(|| key_unavailable(&wire.container))?;

        let plaintext = self
            .crypter
            .open(&key, wire.header.as_bytes(), &wire.body)?;

        let payload: Payload = serde_json::from_slice(&plaintext).map_err(|e| {
            invalid_token(
                InvalidTokenReason::Malformed,
                &format!("Token payload does not deserialize: {e}"),
            )
        })?;

        if payload.container != wire.container {
            return Err(invalid_token(
                InvalidTokenReason::ContainerMismatch,
                &format!(
                    "Payload container {} does not match header container {}",
                    payload.container, wire.container
                ),
            ));
        }

        self.check_ttl(config.ttls(), &wire.container, payload.issued_at()?, now)?;

        let mut claims = payload.into_claims()?;
        if let Some(active_url) = parameters.get(ACTIVE_URL_NAME) {
            validate_active_url(active_url)?;
            claims.active_url = Some(active_url.clone());
        }
        Ok(claims)
    }

    /// Accepts tokens whose age is within `[-skew, ttl + skew]`. The upper bound is inclusive:
    /// a token is still valid exactly `ttl` seconds after issue.
    fn check_ttl(
        &self,
        ttls: &TtlPolicy,
        container: &str,
        issued_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), Error> {
        let ttl = i64::from(ttls.ttl_seconds(container));
        let skew = i64::from(self.clock_skew_secs);
        let age = now.timestamp() - issued_at.timestamp();

        if age < -skew {
            return Err(invalid_token(
                InvalidTokenReason::NotYetValid,
                &format!("Token issued {}s in the future", -age),
            ));
        }
        if age > ttl + skew {
            return Err(invalid_token(
                InvalidTokenReason::Expired,
                &format!("Token age {age}s exceeds TTL {ttl}s"),
            ));
        }
        Ok(())
    }
}

impl SecurityTokenCodec for BlobCrypterCodec {
    fn create_token_at(
        &self,
        parameters: &TokenParameters,
        now: DateTime<Utc>,
    ) -> Result<ClaimSet, Error> {
        self.decode(parameters, now).inspect_err(|err| match err.error_kind {
            ErrorKind::InvalidToken => match err.reason() {
                Some(
                    InvalidTokenReason::Unauthenticated | InvalidTokenReason::ContainerMismatch,
                ) => warn!(
                    "Rejected security token ({:?}): {}",
                    err.reason(),
                    err.detail().unwrap_or_default()
                ),
                reason => debug!(
                    "Rejected security token ({reason:?}): {}",
                    err.detail().unwrap_or_default()
                ),
            },
            ErrorKind::KeyUnavailable => warn!("Unable to verify security token: {:?}", err.source),
            ErrorKind::Config => error!("Unable to verify security token: {err}"),
        })
    }

    fn encode_token_at(&self, claims: &ClaimSet, now: DateTime<Utc>) -> Result<String, Error> {
        claims.validate_for_encode().inspect_err(|err| {
            debug!(
                "Refused to mint security token: {}",
                err.detail().unwrap_or_default()
            )
        })?;

        let config = self.config.snapshot();
        let key = config.keys().key_for(&claims.container)?.ok_or_else(|| {
            warn!(
                "Unable to mint security token: no key for container {}",
                claims.container
            );
            key_unavailable(&claims.container)
        })?;

        // Issue time has whole-second precision on the wire.
        let issued_at = match claims.issued_at() {
            Some(issued_at) => issued_at,
            None => DateTime::from_timestamp(now.timestamp(), 0).unwrap_or(now),
        };

        let payload = serde_json::to_vec(&claims.to_payload(issued_at)).map_err(|e| {
            invalid_token(
                InvalidTokenReason::Serialization,
                &format!("Claims do not serialize: {e}"),
            )
        })?;

        let header = wire::header(self.crypter.version(), &claims.container);
        let body = self.crypter.seal(&key, header.as_bytes(), &payload)?;

        debug!(
            "Minted security token for app {} in container {}",
            claims.app_id, claims.container
        );
        Ok(wire::format(&header, &body))
    }

    fn token_time_to_live(&self, container: &str) -> u32 {
        self.config.snapshot().ttls().ttl_seconds(container)
    }
}
