//! AES-256-GCM blob crypter.
//!
//! The blob layout is `nonce || ciphertext || tag`. The token header is passed as associated
//! data, so it is authenticated without being encrypted.

use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Nonce,
};
use rand::Rng;

use super::BlobCrypter;
use crate::error::{invalid_token, Error, InvalidTokenReason};
use crate::keys::KeyMaterial;

/// 12-byte nonce size for AES-GCM
const NONCE_SIZE: usize = 12;

/// 16-byte authentication tag appended by AES-GCM
const TAG_SIZE: usize = 16;

const VERSION: &str = "1e";

fn encryption_err() -> Error {
    invalid_token(InvalidTokenReason::Serialization, "Encryption failed")
}

fn decryption_err() -> Error {
    invalid_token(InvalidTokenReason::Unauthenticated, "Token authentication failed")
}

/// Encrypting crypter: claims are confidential and authenticated.
#[derive(Debug, Default, Clone, Copy)]
pub struct AesGcmCrypter;

impl BlobCrypter for AesGcmCrypter {
    fn version(&self) -> &'static str {
        VERSION
    }

    fn seal(&self, key: &KeyMaterial, header: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, Error> {
        let cipher = Aes256Gcm::new_from_slice(key.expose()).map_err(|_| encryption_err())?;

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::thread_rng().fill(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(
                nonce,
                Payload {
                    msg: plaintext,
                    aad: header,
                },
            )
            .map_err(|_| encryption_err())?;

        let mut combined = nonce_bytes.to_vec();
        combined.extend(ciphertext);
        Ok(combined)
    }

    fn open(&self, key: &KeyMaterial, header: &[u8], sealed: &[u8]) -> Result<Vec<u8>, Error> {
        if sealed.len() < NONCE_SIZE + TAG_SIZE {
            return Err(decryption_err());
        }
        let cipher = Aes256Gcm::new_from_slice(key.expose()).map_err(|_| decryption_err())?;

        let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_SIZE);
        let nonce = Nonce::from_slice(nonce_bytes);

        cipher
            .decrypt(
                nonce,
                Payload {
                    msg: ciphertext,
                    aad: header,
                },
            )
            .map_err(|_| decryption_err())
    }
}
