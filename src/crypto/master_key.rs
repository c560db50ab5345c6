//! The raw document key and its `mk_` token form.
//!
//! A master key is 32 random bytes used directly as the AES-256-GCM key.
//! Its textual form is `mk_` followed by base64 of the bytes, handed once
//! to the document owner and never written to the document store.

use std::fmt;

use rand::{CryptoRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::codec;
use crate::errors::{Result, ShareLockError};

/// Length of the raw key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// Tag that prefixes every master key token.
pub const MASTER_KEY_PREFIX: &str = "mk_";

/// A 32-byte document key that zeroes its memory when dropped.
///
/// Deliberately not `Clone`: there is exactly one owner at a time.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct RawKey {
    bytes: [u8; KEY_LEN],
}

impl RawKey {
    /// Wrap raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Copy a key out of a slice, checking the length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; KEY_LEN] = bytes
            .try_into()
            .map_err(|_| ShareLockError::InvalidKeyLength {
                expected: KEY_LEN,
                actual: bytes.len(),
            })?;
        Ok(Self { bytes })
    }

    /// Access the raw key bytes (e.g. to pass to the cipher or the dealer).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl fmt::Debug for RawKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RawKey([REDACTED])")
    }
}

/// Draw a fresh key from a cryptographically secure RNG.
pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> RawKey {
    let mut key = RawKey::new([0u8; KEY_LEN]);
    rng.fill_bytes(&mut key.bytes);
    key
}

/// Encode key bytes as an `mk_` token.
///
/// Takes a slice rather than a `RawKey` so foreign input is length-checked.
pub fn serialize(key: &[u8]) -> Result<String> {
    if key.len() != KEY_LEN {
        return Err(ShareLockError::InvalidKeyLength {
            expected: KEY_LEN,
            actual: key.len(),
        });
    }
    Ok(codec::tag(MASTER_KEY_PREFIX, key))
}

/// Parse an `mk_` token back into a key.
pub fn parse(token: &str) -> Result<RawKey> {
    let mut decoded = codec::untag(MASTER_KEY_PREFIX, token)?;
    let key = RawKey::from_slice(&decoded);
    decoded.zeroize();
    key
}

/// Whether `text` is a well-formed master key token. Never fails.
pub fn is_valid(text: &str) -> bool {
    parse(text).is_ok()
}
