//! HMAC-SHA256 sign-only blob crypter.
//!
//! The blob layout is `payload || tag`. Claims stay readable to anyone holding the token but
//! cannot be altered. The MAC input is the length-prefixed header followed by the payload so
//! bytes cannot be shifted between the two.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::BlobCrypter;
use crate::error::{invalid_token, Error, InvalidTokenReason};
use crate::keys::KeyMaterial;

type HmacSha256 = Hmac<Sha256>;

/// 32-byte HMAC-SHA256 tag
const TAG_SIZE: usize = 32;

const VERSION: &str = "1s";

fn unauthenticated() -> Error {
    invalid_token(InvalidTokenReason::Unauthenticated, "Token authentication failed")
}

/// Signing crypter: claims are authenticated but not confidential.
#[derive(Debug, Default, Clone, Copy)]
pub struct HmacCrypter;

impl HmacCrypter {
    fn mac(key: &KeyMaterial, header: &[u8], payload: &[u8]) -> Result<HmacSha256, Error> {
        let mut mac = HmacSha256::new_from_slice(key.expose()).map_err(|_| unauthenticated())?;
        mac.update(&(header.len() as u32).to_be_bytes());
        mac.update(header);
        mac.update(payload);
        Ok(mac)
    }
}

impl BlobCrypter for HmacCrypter {
    fn version(&self) -> &'static str {
        VERSION
    }

    fn seal(&self, key: &KeyMaterial, header: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, Error> {
        let tag = Self::mac(key, header, plaintext)?.finalize().into_bytes();

        let mut combined = plaintext.to_vec();
        combined.extend_from_slice(&tag);
        Ok(combined)
    }

    fn open(&self, key: &KeyMaterial, header: &[u8], sealed: &[u8]) -> Result<Vec<u8>, Error> {
        if sealed.len() < TAG_SIZE {
            return Err(unauthenticated());
        }
        let (payload, tag) = sealed.split_at(sealed.len() - TAG_SIZE);

        Self::mac(key, header, payload)?
            .verify_slice(tag)
            .map_err(|_| unauthenticated())?;

        Ok(payload.to_vec())
    }
}
