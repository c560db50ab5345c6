//! Cryptographic primitives for ShareLock.
//!
//! This module provides:
//! - Base64 text encoding and `prefix_` token framing (`codec`)
//! - Master key generation and `mk_` tokens (`master_key`)
//! - AES-256-GCM encryption and decryption (`encryption`)
//! - Shamir threshold sharing with `sk_` tokens (`shares`)

pub mod codec;
pub mod encryption;
pub mod master_key;
pub mod shares;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, split, combine, ...};
pub use encryption::{decrypt, encrypt, EncryptedPayload, NONCE_LEN};
pub use master_key::{generate, is_valid, parse, serialize, RawKey, KEY_LEN};
pub use shares::{combine, is_valid_share, split, ShareConfig};
