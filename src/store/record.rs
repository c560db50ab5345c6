//! Document record types and the store's input validation.
//!
//! A record holds only what is safe to keep server-side: the title, the
//! base64 ciphertext and IV, the share configuration, and a timestamp.
//! Keys and shares never appear here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::crypto::shares::ShareConfig;
use crate::errors::{Result, ShareLockError};

/// Longest accepted title, in characters.
pub const MAX_TITLE_LEN: usize = 500;

/// Largest accepted ciphertext, in base64 characters (~1 MB).
pub const MAX_ENCRYPTED_CONTENT_LEN: usize = 1_048_576;

/// Longest accepted IV text.  Base64 of 12 bytes is 16 characters.
pub const MAX_IV_LEN: usize = 24;

/// A stored document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub id: String,
    pub title: String,
    pub encrypted_content: String,
    pub iv: String,
    pub total_shares: u8,
    pub threshold: u8,
    pub created_at: DateTime<Utc>,
}

impl DocumentRecord {
    /// The share configuration chosen when the document was created.
    pub fn share_config(&self) -> Result<ShareConfig> {
        ShareConfig::new(self.total_shares, self.threshold)
    }
}

/// Input to `DocumentStore::create`.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub title: String,
    pub encrypted_content: String,
    pub iv: String,
    pub total_shares: u8,
    pub threshold: u8,
}

impl NewDocument {
    /// Check sizes and the share configuration before anything is written.
    pub fn validate(&self) -> Result<()> {
        let title_len = self.title.chars().count();
        if title_len == 0 || title_len > MAX_TITLE_LEN {
            return Err(ShareLockError::InvalidDocument(format!(
                "title must be between 1 and {MAX_TITLE_LEN} characters"
            )));
        }

        if self.encrypted_content.is_empty() {
            return Err(ShareLockError::InvalidDocument(
                "encrypted content cannot be empty".into(),
            ));
        }
        if self.encrypted_content.len() > MAX_ENCRYPTED_CONTENT_LEN {
            return Err(ShareLockError::InvalidDocument(
                "encrypted content exceeds maximum size".into(),
            ));
        }

        if self.iv.is_empty() || self.iv.len() > MAX_IV_LEN {
            return Err(ShareLockError::InvalidDocument("invalid IV length".into()));
        }

        ShareConfig::new(self.total_shares, self.threshold)
            .map_err(|e| ShareLockError::InvalidDocument(e.to_string()))?;

        Ok(())
    }
}
