//! `sharelock reshare` — issue a fresh set of shares for a document.
//!
//! The new set is independent of the old one: shares from the two sets
//! cannot be mixed, but either set alone still unlocks the document.

use console::style;

use crate::cli::{audit_event, output, prompt_master_key, store_dir, Cli};
use crate::document::reshare;
use crate::errors::{Result, ShareLockError};
use crate::session::KeySession;
use crate::store::DocumentStore;

/// Execute the `reshare` command.
pub fn execute(cli: &Cli, id: &str) -> Result<()> {
    let dir = store_dir(cli)?;
    let store = DocumentStore::new(&dir);

    let record = store
        .get(id)?
        .ok_or_else(|| ShareLockError::DocumentNotFound(id.to_string()))?;

    let token = prompt_master_key()?;

    let mut session = KeySession::new();
    let shares = reshare(&mut session, &record, &token);
    session.lock();
    let shares = shares?;

    println!(
        "{}",
        style(format!(
            "New key holder shares (any {} of {} unlock the document):",
            record.threshold, record.total_shares
        ))
        .bold()
    );
    output::print_shares(&shares);
    println!();
    output::warning("Do not mix these shares with shares from an earlier set.");

    audit_event(
        &dir,
        "reshare",
        Some(id),
        Some(&format!("{} shares", shares.len())),
    );

    Ok(())
}
