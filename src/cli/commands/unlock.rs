//! `sharelock unlock` — decrypt a document by combining shares.

use crate::cli::commands::open::print_body;
use crate::cli::{audit_event, collect_shares, store_dir, Cli};
use crate::document::open_with_shares;
use crate::errors::{Result, ShareLockError};
use crate::session::KeySession;
use crate::store::DocumentStore;

/// Execute the `unlock` command.
pub fn execute(cli: &Cli, id: &str, provided: &[String]) -> Result<()> {
    let dir = store_dir(cli)?;
    let store = DocumentStore::new(&dir);

    let record = store
        .get(id)?
        .ok_or_else(|| ShareLockError::DocumentNotFound(id.to_string()))?;

    let shares = collect_shares(provided, usize::from(record.threshold))?;

    let mut session = KeySession::new();
    let result = open_with_shares(&mut session, &record, &shares[..]);
    session.lock();

    match result {
        Ok(body) => {
            audit_event(
                &dir,
                "unlock",
                Some(id),
                Some(&format!("{} shares", shares.len())),
            );
            print_body(&body);
            Ok(())
        }
        Err(e) => {
            if matches!(e, ShareLockError::AuthenticationFailure) {
                audit_event(&dir, "unlock", Some(id), Some("decryption failed"));
            }
            Err(e)
        }
    }
}
