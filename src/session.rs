//! Key lifecycle for a single document session.
//!
//! `KeySession` owns the one long-lived copy of a document key.  It starts
//! locked, is unlocked by a master key token, by generating a fresh key, or
//! by combining shares, and goes back to locked on `lock()` or when dropped.
//! Every operation that needs the key fails with `NotUnlocked` while locked.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::crypto::encryption::{self, EncryptedPayload};
use crate::crypto::master_key::{self, RawKey};
use crate::crypto::shares::{self, ShareConfig};
use crate::errors::{Result, ShareLockError};

/// Key material held while unlocked.
struct UnlockedKey {
    key: RawKey,
    /// The `mk_` token, when the session was opened with (or created) one.
    master_token: Option<Zeroizing<String>>,
}

/// Locked/unlocked holder of one document key.
///
/// Methods take `&mut self`, so a session cannot be used from two places at
/// once.  Build one session per document.
pub struct KeySession<R: RngCore + CryptoRng = OsRng> {
    slot: Option<UnlockedKey>,
    rng: R,
}

impl KeySession<OsRng> {
    /// A locked session backed by the operating system RNG.
    pub fn new() -> Self {
        Self::with_rng(OsRng)
    }
}

impl Default for KeySession<OsRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore + CryptoRng> KeySession<R> {
    /// A locked session drawing randomness from `rng`.
    pub fn with_rng(rng: R) -> Self {
        Self { slot: None, rng }
    }

    pub fn is_unlocked(&self) -> bool {
        self.slot.is_some()
    }

    /// The master key token, if this session holds one.
    ///
    /// `None` while locked and after unlocking with shares.
    pub fn master_token(&self) -> Option<&str> {
        self.slot
            .as_ref()
            .and_then(|s| s.master_token.as_deref())
            .map(String::as_str)
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    /// Unlock with an `mk_` token.
    ///
    /// A token that fails to parse leaves the session as it was.
    pub fn unlock_with_master_key(&mut self, token: &str) -> Result<()> {
        let key = master_key::parse(token)?;
        self.hold(key, Some(Zeroizing::new(token.to_string())));
        Ok(())
    }

    /// Generate a fresh key, unlock with it, and return its token.
    ///
    /// This is the only time the token is produced; show it to the owner
    /// right away.
    pub fn generate_and_unlock(&mut self) -> Result<Zeroizing<String>> {
        let key = master_key::generate(&mut self.rng);
        let token = Zeroizing::new(master_key::serialize(key.as_bytes())?);
        self.hold(key, Some(token.clone()));
        Ok(token)
    }

    /// Unlock with a key rebuilt from share tokens.
    ///
    /// Too few shares still "unlock", but with the wrong key: the next
    /// `decrypt_for_read` then fails with `AuthenticationFailure`.
    pub fn unlock_with_shares<S: AsRef<str>>(&mut self, tokens: &[S]) -> Result<()> {
        let key = shares::combine(tokens)?;
        self.hold(key, None);
        Ok(())
    }

    /// Drop the key and token.  Idempotent.
    pub fn lock(&mut self) {
        // RawKey and Zeroizing wipe themselves on drop.
        self.slot = None;
    }

    fn hold(&mut self, key: RawKey, master_token: Option<Zeroizing<String>>) {
        self.lock();
        self.slot = Some(UnlockedKey { key, master_token });
    }

    fn key(&self) -> Result<&RawKey> {
        self.slot
            .as_ref()
            .map(|s| &s.key)
            .ok_or(ShareLockError::NotUnlocked)
    }

    // ------------------------------------------------------------------
    // Keyed operations
    // ------------------------------------------------------------------

    /// Encrypt document text under the held key.
    pub fn encrypt_for_write(&mut self, plaintext: &str) -> Result<EncryptedPayload> {
        let unlocked = self.slot.as_ref().ok_or(ShareLockError::NotUnlocked)?;
        encryption::encrypt(plaintext, unlocked.key.as_bytes(), &mut self.rng)
    }

    /// Split the held key into a fresh set of share tokens.
    pub fn export_shares(&mut self, config: ShareConfig) -> Result<Vec<String>> {
        let unlocked = self.slot.as_ref().ok_or(ShareLockError::NotUnlocked)?;
        shares::split(&unlocked.key, config, &mut self.rng)
    }

    /// Decrypt a stored ciphertext/nonce pair with the held key.
    pub fn decrypt_for_read(&self, ciphertext: &str, nonce: &str) -> Result<String> {
        encryption::decrypt(ciphertext, nonce, self.key()?.as_bytes())
    }
}

impl<R: RngCore + CryptoRng> Drop for KeySession<R> {
    fn drop(&mut self) {
        self.lock();
    }
}
