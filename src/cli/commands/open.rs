//! `sharelock open` — decrypt a document with its master key.

use crate::cli::{audit_event, output, prompt_master_key, store_dir, Cli};
use crate::document::{open_with_master_key, DocumentBody};
use crate::errors::{Result, ShareLockError};
use crate::session::KeySession;
use crate::store::DocumentStore;

/// Execute the `open` command.
pub fn execute(cli: &Cli, id: &str) -> Result<()> {
    let dir = store_dir(cli)?;
    let store = DocumentStore::new(&dir);

    let record = store
        .get(id)?
        .ok_or_else(|| ShareLockError::DocumentNotFound(id.to_string()))?;

    let token = prompt_master_key()?;

    let mut session = KeySession::new();
    let result = open_with_master_key(&mut session, &record, &token);
    session.lock();

    match result {
        Ok(body) => {
            audit_event(&dir, "open", Some(id), Some("master key"));
            print_body(&body);
            Ok(())
        }
        Err(e) => {
            if matches!(e, ShareLockError::AuthenticationFailure) {
                audit_event(&dir, "open", Some(id), Some("decryption failed"));
            }
            Err(e)
        }
    }
}

/// Print a decrypted document: title as a header line, then the text.
pub fn print_body(body: &DocumentBody) {
    output::success(&format!("Decrypted: {}", body.title()));
    match body.content() {
        Some(content) => println!("{content}"),
        None => output::info("This document has no content."),
    }
}
