//! Threshold sharing of the document key (Shamir over GF(256)).
//!
//! `split` hands out `total` shares of which any `threshold` rebuild the
//! key.  Each share is serialized in the `sharks` wire format
//! (`[x | y_0 .. y_31]`, x being the evaluation point) and tagged `sk_`.
//!
//! The share bytes do not record the threshold, so `combine` cannot tell a
//! complete set from an incomplete one.  Too few shares interpolate to an
//! unrelated key; the caller finds out when decryption fails its
//! authentication check.

use rand::{CryptoRng, RngCore};
use sharks::{Share, Sharks};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use super::codec;
use super::master_key::RawKey;
use crate::errors::{Result, ShareLockError};

/// Tag that prefixes every share token.
pub const SHARE_PREFIX: &str = "sk_";

/// Smallest bytes-on-the-wire share: one x byte plus at least one y byte.
const MIN_SHARE_LEN: usize = 2;

/// How many shares to hand out and how many it takes to unlock.
///
/// Invariant: `2 <= threshold <= total <= 20`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShareConfig {
    total: u8,
    threshold: u8,
}

impl ShareConfig {
    /// Fewest shares that may be required to unlock.
    pub const MIN_THRESHOLD: u8 = 2;

    /// Most shares a single document may hand out.
    pub const MAX_TOTAL: u8 = 20;

    pub fn new(total: u8, threshold: u8) -> Result<Self> {
        if threshold < Self::MIN_THRESHOLD {
            return Err(ShareLockError::InvalidConfiguration(format!(
                "threshold must be at least {} (got {threshold})",
                Self::MIN_THRESHOLD
            )));
        }
        if total < threshold {
            return Err(ShareLockError::InvalidConfiguration(format!(
                "total shares ({total}) must be >= threshold ({threshold})"
            )));
        }
        if total > Self::MAX_TOTAL {
            return Err(ShareLockError::InvalidConfiguration(format!(
                "total shares must not exceed {} (got {total})",
                Self::MAX_TOTAL
            )));
        }
        Ok(Self { total, threshold })
    }

    pub fn total(&self) -> u8 {
        self.total
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }
}

/// Split `key` into `config.total()` share tokens.
///
/// Every call draws fresh polynomial coefficients, so only shares from the
/// same call can be combined with each other.
pub fn split<R: RngCore + CryptoRng>(
    key: &RawKey,
    config: ShareConfig,
    rng: &mut R,
) -> Result<Vec<String>> {
    let dealer = Sharks(config.threshold()).dealer_rng(key.as_bytes(), rng);

    let tokens: Vec<String> = dealer
        .take(usize::from(config.total()))
        .map(|share| {
            let bytes = Zeroizing::new(Vec::from(&share));
            codec::tag(SHARE_PREFIX, &bytes)
        })
        .collect();

    if tokens.len() != usize::from(config.total()) {
        return Err(ShareLockError::InvalidConfiguration(format!(
            "dealer produced {} shares, expected {}",
            tokens.len(),
            config.total()
        )));
    }

    Ok(tokens)
}

/// Rebuild a key from share tokens.
///
/// Exact duplicates are collapsed.  Two different shares claiming the same
/// evaluation point, or shares of different lengths, are rejected.
pub fn combine<S: AsRef<str>>(tokens: &[S]) -> Result<RawKey> {
    let mut distinct: Vec<Zeroizing<Vec<u8>>> = Vec::with_capacity(tokens.len());

    for token in tokens {
        let bytes = Zeroizing::new(decode_share(token.as_ref())?);

        if let Some(first) = distinct.first() {
            if first.len() != bytes.len() {
                return Err(ShareLockError::InvalidFormat(
                    "shares have different lengths — they belong to different keys".into(),
                ));
            }
        }

        match distinct.iter().find(|seen| seen[0] == bytes[0]) {
            Some(seen) if bool::from(seen.as_slice().ct_eq(bytes.as_slice())) => continue,
            Some(_) => {
                return Err(ShareLockError::InvalidFormat(format!(
                    "conflicting shares for index {}",
                    bytes[0]
                )));
            }
            None => distinct.push(bytes),
        }
    }

    if distinct.len() < usize::from(ShareConfig::MIN_THRESHOLD) {
        return Err(ShareLockError::InsufficientShares {
            needed: usize::from(ShareConfig::MIN_THRESHOLD),
            got: distinct.len(),
        });
    }

    let shares = distinct
        .iter()
        .map(|bytes| {
            Share::try_from(bytes.as_slice())
                .map_err(|e| ShareLockError::InvalidFormat(format!("invalid share data: {e}")))
        })
        .collect::<Result<Vec<_>>>()?;

    // Distinct non-zero x coordinates: never more than 255.
    let count = u8::try_from(shares.len())
        .map_err(|_| ShareLockError::InvalidFormat("too many shares".into()))?;

    let secret = Sharks(count)
        .recover(&shares)
        .map(Zeroizing::new)
        .map_err(|e| ShareLockError::InvalidFormat(format!("share recovery failed: {e}")))?;

    RawKey::from_slice(&secret)
}

/// Whether `text` is a structurally valid share token. Never fails.
pub fn is_valid_share(text: &str) -> bool {
    decode_share(text).is_ok()
}

fn decode_share(token: &str) -> Result<Vec<u8>> {
    let bytes = codec::untag(SHARE_PREFIX, token)?;
    if bytes.len() < MIN_SHARE_LEN {
        return Err(ShareLockError::InvalidFormat("share is too short".into()));
    }
    if bytes[0] == 0 {
        return Err(ShareLockError::InvalidFormat(
            "share index 0 is reserved for the secret".into(),
        ));
    }
    Ok(bytes)
}
