//! Binary-to-text encoding and tagged token framing.
//!
//! Every key and share leaves this crate as text: a short tag such as
//! `mk_` or `sk_` followed by standard (padded, unwrapped) base64.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::errors::{Result, ShareLockError};

/// Encode bytes as standard base64.
pub fn bytes_to_text(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

/// Decode standard base64 text.
pub fn text_to_bytes(text: &str) -> Result<Vec<u8>> {
    BASE64
        .decode(text)
        .map_err(|e| ShareLockError::InvalidFormat(format!("malformed base64: {e}")))
}

/// Build a token: `prefix` followed by the base64 encoding of `bytes`.
pub fn tag(prefix: &str, bytes: &[u8]) -> String {
    let mut token = String::with_capacity(prefix.len() + bytes.len().div_ceil(3) * 4);
    token.push_str(prefix);
    BASE64.encode_string(bytes, &mut token);
    token
}

/// Strip `prefix` from `token` and decode the remaining payload.
pub fn untag(prefix: &str, token: &str) -> Result<Vec<u8>> {
    let payload = token.strip_prefix(prefix).ok_or_else(|| {
        ShareLockError::InvalidFormat(format!("token must start with '{prefix}'"))
    })?;
    text_to_bytes(payload)
}
