//! This module wires the `token_auth` codec to the service configuration and exposes the
//! operations the rest of the application needs: minting a token for a gadget, verifying a
//! token handed back by a gadget, and reloading keys and TTLs without a restart.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain::security_token::SecurityTokens;
//! use service::config::Config;
//! use token_auth::ClaimSet;
//!
//! let tokens = SecurityTokens::from_config(&Config::new())?;
//! let minted = tokens.mint(
//!     &ClaimSet::builder()
//!         .owner_id("u1")
//!         .viewer_id("u1")
//!         .app_id("app1")
//!         .container("acme")
//!         .build(),
//! )?;
//! let claims = tokens.verify(&minted.token, None)?;
//! ```

use crate::error::Error;
use log::*;
use secrecy::ExposeSecret;
use serde::Serialize;
use service::config::{Config, TokenCrypter};
use std::sync::Arc;
use token_auth::{
    parse_key_entries, BlobCrypterCodec, ClaimSet, ConfigSnapshot, SecurityTokenCodec,
    SnapshotSource, TokenParameters, TtlPolicy, ACTIVE_URL_NAME, SECURITY_TOKEN_NAME,
};

/// A freshly minted token along with how long it lives.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MintedToken {
    pub token: String,
    pub container: String,
    pub ttl_seconds: u32,
}

/// The configured codec plus a handle to its reloadable configuration.
pub struct SecurityTokens {
    codec: Arc<dyn SecurityTokenCodec>,
    config: Arc<SnapshotSource>,
}

impl SecurityTokens {
    /// Builds the codec selected by `config.token_crypter` from the configured key and TTL
    /// entries.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let (snapshot, containers) = build_snapshot(config)?;
        let source = Arc::new(SnapshotSource::new(snapshot));

        let codec = match config.token_crypter {
            TokenCrypter::Encrypted => BlobCrypterCodec::encrypted(source.clone()),
            TokenCrypter::Signed => BlobCrypterCodec::signed(source.clone()),
        }
        .with_clock_skew_secs(config.token_clock_skew_secs);

        if containers.is_empty() {
            warn!("No security token keys configured; minting and verification will fail");
        }
        info!(
            "Security token codec configured: crypter={}, default_ttl={}s, clock_skew={}s, containers={:?}",
            config.token_crypter,
            config.security_token_ttl,
            config.token_clock_skew_secs,
            containers,
        );

        Ok(Self {
            codec: Arc::new(codec),
            config: source,
        })
    }

    /// The shared codec, for callers that work with raw token parameters.
    pub fn codec(&self) -> Arc<dyn SecurityTokenCodec> {
        Arc::clone(&self.codec)
    }

    /// Re-reads keys and TTLs from `config` and publishes them as one snapshot. Nothing changes
    /// unless both parse. The crypter choice is fixed at construction.
    pub fn reload(&self, config: &Config) -> Result<(), Error> {
        let (snapshot, containers) = build_snapshot(config)?;
        self.config.replace(snapshot);

        info!("Reloaded security token configuration for containers {containers:?}");
        Ok(())
    }

    /// Encodes `claims` into a token for the gadget.
    pub fn mint(&self, claims: &ClaimSet) -> Result<MintedToken, Error> {
        let token = self.codec.encode_token(claims)?;
        Ok(MintedToken {
            token,
            container: claims.container.clone(),
            ttl_seconds: self.codec.token_time_to_live(&claims.container),
        })
    }

    /// Verifies a token handed back by a gadget, optionally rebinding it to `active_url`.
    pub fn verify(&self, token: &str, active_url: Option<&str>) -> Result<ClaimSet, Error> {
        let mut parameters = TokenParameters::new();
        parameters.insert(SECURITY_TOKEN_NAME.to_string(), token.to_string());
        if let Some(active_url) = active_url {
            parameters.insert(ACTIVE_URL_NAME.to_string(), active_url.to_string());
        }
        Ok(self.codec.create_token(&parameters)?)
    }

    /// Effective TTL in seconds for tokens minted for `container`.
    pub fn ttl_seconds(&self, container: &str) -> u32 {
        self.codec.token_time_to_live(container)
    }
}

/// Parses keys and TTLs into one snapshot, returning it with the sorted container names.
fn build_snapshot(config: &Config) -> Result<(ConfigSnapshot, Vec<String>), Error> {
    let keys = parse_key_entries(
        config
            .container_token_keys()
            .iter()
            .map(|entry| entry.expose_secret().as_str()),
    )
    .map_err(|e| {
        warn!("Invalid container token key configuration: {e}");
        Error::from(e)
    })?;
    let ttls = TtlPolicy::from_entries(config.security_token_ttl, config.container_token_ttls())
        .map_err(|e| {
            warn!("Invalid container token TTL configuration: {e}");
            Error::from(e)
        })?;

    let mut containers: Vec<String> = keys.keys().cloned().collect();
    containers.sort();
    Ok((ConfigSnapshot::new(keys, ttls), containers))
}
