//! AES-256-GCM authenticated encryption of document text.
//!
//! Each call to `encrypt` draws a fresh random 12-byte nonce.  Unlike a
//! single-blob layout, the nonce travels next to the ciphertext rather than
//! inside it, because the document record stores them as separate fields:
//!
//!   ciphertext = base64(AES-GCM output, auth tag appended)
//!   nonce      = base64(12 random bytes)

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use super::codec;
use super::master_key::KEY_LEN;
use crate::errors::{Result, ShareLockError};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Ciphertext and nonce, both base64 text, as handed to the document store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedPayload {
    pub ciphertext: String,
    pub nonce: String,
}

/// Encrypt `plaintext` under a 32-byte `key` with a fresh nonce from `rng`.
pub fn encrypt<R: RngCore + CryptoRng>(
    plaintext: &str,
    key: &[u8],
    rng: &mut R,
) -> Result<EncryptedPayload> {
    let cipher = cipher_for(key)?;

    let mut nonce = [0u8; NONCE_LEN];
    rng.fill_bytes(&mut nonce);

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext.as_bytes())
        .map_err(|e| ShareLockError::EncryptionFailed(format!("encryption error: {e}")))?;

    Ok(EncryptedPayload {
        ciphertext: codec::bytes_to_text(&ciphertext),
        nonce: codec::bytes_to_text(&nonce),
    })
}

/// Decrypt a payload produced by `encrypt`.
///
/// A key that is not 32 bytes is `InvalidKeyLength`, as in `encrypt`.
/// Any failure of a well-sized key, the nonce, or the tag surfaces as the
/// same `AuthenticationFailure`.
pub fn decrypt(ciphertext: &str, nonce: &str, key: &[u8]) -> Result<String> {
    let cipher = cipher_for(key)?;

    let ciphertext = codec::text_to_bytes(ciphertext)?;
    let nonce = codec::text_to_bytes(nonce)?;
    if nonce.len() != NONCE_LEN {
        return Err(ShareLockError::AuthenticationFailure);
    }

    let plaintext = cipher
        .decrypt(Nonce::from_slice(&nonce), ciphertext.as_slice())
        .map_err(|_| ShareLockError::AuthenticationFailure)?;

    String::from_utf8(plaintext).map_err(|e| {
        let mut bytes = e.into_bytes();
        bytes.zeroize();
        ShareLockError::InvalidFormat("decrypted content is not valid UTF-8".into())
    })
}

fn cipher_for(key: &[u8]) -> Result<Aes256Gcm> {
    if key.len() != KEY_LEN {
        return Err(ShareLockError::InvalidKeyLength {
            expected: KEY_LEN,
            actual: key.len(),
        });
    }
    Aes256Gcm::new_from_slice(key)
        .map_err(|e| ShareLockError::EncryptionFailed(format!("invalid key: {e}")))
}
