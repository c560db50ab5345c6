//! Document-level flows built on a `KeySession` and a `DocumentStore`.
//!
//! The encrypted plaintext is a small JSON envelope,
//! `{"title": "...", "content": "..." | null}`, so the title travels inside
//! the ciphertext as well as in the clear record.
//!
//! On success the session is left unlocked; the caller locks it, or the
//! session's `Drop` does.  A failed decryption locks it immediately.

use std::collections::HashSet;

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::crypto::shares::{self, ShareConfig};
use crate::errors::{Result, ShareLockError};
use crate::session::KeySession;
use crate::store::{DocumentRecord, DocumentStore, NewDocument};

/// The decrypted contents of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct DocumentBody {
    title: String,
    content: Option<String>,
}

impl DocumentBody {
    /// Blank content (only whitespace) is stored as `null`.
    pub fn new(title: &str, content: &str) -> Self {
        let content = if content.trim().is_empty() {
            None
        } else {
            Some(content.to_string())
        };
        Self {
            title: title.to_string(),
            content,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    fn to_plaintext(&self) -> Result<Zeroizing<String>> {
        serde_json::to_string(self)
            .map(Zeroizing::new)
            .map_err(|e| ShareLockError::SerializationError(format!("document body: {e}")))
    }

    fn from_plaintext(plaintext: &str) -> Result<Self> {
        serde_json::from_str(plaintext).map_err(|_| {
            ShareLockError::InvalidFormat("decrypted document is not a valid body".into())
        })
    }
}

/// Everything the owner must capture right after creating a document.
pub struct CreatedDocument {
    pub id: String,
    pub master_token: Zeroizing<String>,
    /// Share tokens in dealing order; share `i` is `shares[i - 1]`.
    pub shares: Zeroizing<Vec<String>>,
}

/// Generate a key, encrypt `body`, split the key, and store the ciphertext.
///
/// The session is left unlocked with the new key.
pub fn seal_document<R: RngCore + CryptoRng>(
    session: &mut KeySession<R>,
    store: &DocumentStore,
    body: &DocumentBody,
    config: ShareConfig,
) -> Result<CreatedDocument> {
    let master_token = session.generate_and_unlock()?;

    let plaintext = body.to_plaintext()?;
    let payload = session.encrypt_for_write(&plaintext)?;
    let shares = Zeroizing::new(session.export_shares(config)?);

    let id = store.create(NewDocument {
        title: body.title.clone(),
        encrypted_content: payload.ciphertext,
        iv: payload.nonce,
        total_shares: config.total(),
        threshold: config.threshold(),
    })?;

    Ok(CreatedDocument {
        id,
        master_token,
        shares,
    })
}

/// Unlock with a master key token and decrypt `record`.
pub fn open_with_master_key<R: RngCore + CryptoRng>(
    session: &mut KeySession<R>,
    record: &DocumentRecord,
    master_token: &str,
) -> Result<DocumentBody> {
    session.unlock_with_master_key(master_token)?;
    decrypt_record(session, record)
}

/// Unlock with share tokens and decrypt `record`.
///
/// Cheap checks run first: at least `record.threshold` distinct tokens,
/// each structurally valid.  A wrong-but-well-formed set of shares then
/// fails as `AuthenticationFailure` and leaves the session locked.
pub fn open_with_shares<R: RngCore + CryptoRng, S: AsRef<str>>(
    session: &mut KeySession<R>,
    record: &DocumentRecord,
    tokens: &[S],
) -> Result<DocumentBody> {
    let distinct: HashSet<&str> = tokens.iter().map(|t| t.as_ref()).collect();
    let needed = usize::from(record.threshold);
    if distinct.len() < needed {
        return Err(ShareLockError::InsufficientShares {
            needed,
            got: distinct.len(),
        });
    }

    if !tokens.iter().all(|t| shares::is_valid_share(t.as_ref())) {
        return Err(ShareLockError::InvalidFormat(
            "one or more share tokens are invalid".into(),
        ));
    }

    session.unlock_with_shares(tokens)?;
    decrypt_record(session, record)
}

/// Issue a fresh share set for an existing document.
///
/// The master key must decrypt the record first.  The new set uses the
/// record's own configuration, which never changes after creation.  Old
/// shares keep working: they interpolate to the same key.
pub fn reshare<R: RngCore + CryptoRng>(
    session: &mut KeySession<R>,
    record: &DocumentRecord,
    master_token: &str,
) -> Result<Zeroizing<Vec<String>>> {
    let config = record.share_config()?;
    open_with_master_key(session, record, master_token)?;
    session.export_shares(config).map(Zeroizing::new)
}

/// Decrypt `record` with the held key.  On any failure the session is
/// locked so a wrong key is not left behind.
fn decrypt_record<R: RngCore + CryptoRng>(
    session: &mut KeySession<R>,
    record: &DocumentRecord,
) -> Result<DocumentBody> {
    let body = session
        .decrypt_for_read(&record.encrypted_content, &record.iv)
        .map(Zeroizing::new)
        .and_then(|plaintext| DocumentBody::from_plaintext(&plaintext));

    if body.is_err() {
        session.lock();
    }
    body
}
