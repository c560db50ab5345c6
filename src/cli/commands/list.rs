//! `sharelock list` — display stored documents in a table.

use crate::cli::{output, store_dir, Cli};
use crate::errors::Result;
use crate::store::DocumentStore;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let store = DocumentStore::new(store_dir(cli)?);
    let documents = store.list()?;

    if !documents.is_empty() {
        output::info(&format!("{} document(s)", documents.len()));
    }
    output::print_documents_table(&documents);

    Ok(())
}
