//! # token-auth
//!
//! Stateless issuing and verification of gadget security tokens:
//! - `ClaimSet` data model for the owner, viewer, app and container a token speaks for
//! - `SecurityTokenCodec` encode/decode with integrity, authenticity and TTL enforcement
//! - Per-container TTL policy with a global fallback
//! - Per-container key material behind the `KeyProvider` trait
//!
//! ## Architecture
//!
//! Tokens are sealed by a `BlobCrypter` (AES-256-GCM or HMAC-SHA256) with the token header,
//! which names the container, bound into the authenticator. Keys and TTLs are published
//! together as one `ConfigSnapshot` that can be swapped while requests are in flight; each
//! call works from a single snapshot.
//!
//! ## Usage
//!
//! ```rust
//! use std::collections::HashMap;
//! use std::sync::Arc;
//! use token_auth::{
//!     BlobCrypterCodec, ClaimSet, ConfigSnapshot, SecurityTokenCodec, SnapshotSource,
//!     SECURITY_TOKEN_NAME,
//! };
//!
//! let snapshot = ConfigSnapshot::from_entries(
//!     3600,
//!     ["acme=0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef"],
//!     ["acme=3600"],
//! )
//! .unwrap();
//! let codec = BlobCrypterCodec::encrypted(Arc::new(SnapshotSource::new(snapshot)));
//!
//! let claims = ClaimSet::builder()
//!     .owner_id("u1")
//!     .viewer_id("u1")
//!     .app_id("app1")
//!     .container("acme")
//!     .build();
//! let token = codec.encode_token(&claims).unwrap();
//!
//! let mut parameters = HashMap::new();
//! parameters.insert(SECURITY_TOKEN_NAME.to_string(), token);
//! let decoded = codec.create_token(&parameters).unwrap();
//! assert_eq!(decoded.viewer_id, "u1");
//! ```

pub mod claims;
pub mod codec;
pub mod crypter;
pub mod error;
pub mod keys;
pub mod snapshot;
pub mod ttl;

// Re-export commonly used types
pub use claims::{ClaimSet, ClaimSetBuilder};
pub use codec::{
    BlobCrypterCodec, SecurityTokenCodec, TokenParameters, ACTIVE_URL_NAME,
    SECURITY_TOKEN_NAME, SECURITY_TOKEN_TTL_CONFIG,
};
pub use error::{Error, ErrorKind};
pub use keys::{parse_key_entries, KeyMaterial, KeyProvider};
pub use snapshot::{ConfigSnapshot, SnapshotSource};
pub use ttl::{TtlPolicy, DEFAULT_TOKEN_TTL_SECS};
