//! Authenticated blob protection for token payloads.
//!
//! A crypter turns a serialized payload into an opaque, authenticated blob bound to a header
//! (version and container), and back. Opening fails with one generic error whether the tag,
//! the ciphertext or the header was altered.

mod aes_gcm;
mod hmac;

pub use self::aes_gcm::AesGcmCrypter;
pub use self::hmac::HmacCrypter;

use crate::error::Error;
use crate::keys::KeyMaterial;

/// Trait for sealing and opening token blobs.
pub trait BlobCrypter: Send + Sync {
    /// Wire version tag emitted and accepted by this crypter.
    fn version(&self) -> &'static str;

    /// Protect `plaintext`, authenticating `header` alongside it.
    fn seal(&self, key: &KeyMaterial, header: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, Error>;

    /// Verify and recover the plaintext sealed with the same key and header.
    fn open(&self, key: &KeyMaterial, header: &[u8], sealed: &[u8]) -> Result<Vec<u8>, Error>;
}
