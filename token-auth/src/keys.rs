//! Key material lookup keyed by container.
//!
//! The codec only ever reads key material through the [`KeyProvider`] trait. A missing key is a
//! hard failure at both encode and decode time; there is no unsigned fallback.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretVec};

use crate::error::{config_error, Error};

/// Length in bytes of a container key.
pub const KEY_SIZE: usize = 32;

/// Secret key material for one container.
///
/// Cloning is cheap and never copies the secret bytes.
#[derive(Clone)]
pub struct KeyMaterial {
    secret: Arc<SecretVec<u8>>,
}

impl KeyMaterial {
    /// Wrap raw key bytes. The key must be exactly [`KEY_SIZE`] bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Error> {
        if bytes.len() != KEY_SIZE {
            return Err(config_error(&format!(
                "Key must be {KEY_SIZE} bytes, got {}",
                bytes.len()
            )));
        }
        Ok(Self {
            secret: Arc::new(SecretVec::new(bytes)),
        })
    }

    /// Parse a key provided as a hex string (64 characters).
    pub fn from_hex(key_hex: &str) -> Result<Self, Error> {
        let bytes = hex::decode(key_hex.trim())
            .map_err(|e| config_error(&format!("Key is not valid hex: {e}")))?;
        Self::from_bytes(bytes)
    }

    pub(crate) fn expose(&self) -> &[u8] {
        self.secret.expose_secret().as_slice()
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("KeyMaterial([REDACTED])")
    }
}

/// Supplies signing/encryption key material per container.
///
/// `Ok(None)` means the container has no key configured. `Err` means the provider could not
/// answer at all (for example a remote store timing out) and should carry
/// `ErrorKind::KeyUnavailable`; see [`crate::error::key_unavailable`].
pub trait KeyProvider: Send + Sync {
    fn key_for(&self, container: &str) -> Result<Option<KeyMaterial>, Error>;
}

impl KeyProvider for HashMap<String, KeyMaterial> {
    fn key_for(&self, container: &str) -> Result<Option<KeyMaterial>, Error> {
        Ok(self.get(container).cloned())
    }
}

/// Parse `container=<hex key>` entries into a key map.
pub fn parse_key_entries<I, S>(entries: I) -> Result<HashMap<String, KeyMaterial>, Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut keys = HashMap::new();
    for entry in entries {
        let entry = entry.as_ref();
        let (container, key_hex) = entry
            .split_once('=')
            .ok_or_else(|| config_error("Key entries must be formatted as container=hexkey"))?;
        let container = container.trim();
        if container.is_empty() {
            return Err(config_error("Key entry has an empty container name"));
        }
        keys.insert(container.to_string(), KeyMaterial::from_hex(key_hex)?);
    }
    Ok(keys)
}
