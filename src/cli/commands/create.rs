//! `sharelock create` — encrypt a document and hand out its keys.

use std::fs;
use std::io::{IsTerminal, Read};

use console::style;
use zeroize::Zeroizing;

use crate::cli::{audit_event, output, store_dir, Cli};
use crate::config::Settings;
use crate::document::{seal_document, DocumentBody};
use crate::errors::Result;
use crate::session::KeySession;
use crate::store::DocumentStore;

/// Execute the `create` command.
pub fn execute(
    cli: &Cli,
    title: &str,
    file: Option<&str>,
    shares: Option<u8>,
    threshold: Option<u8>,
) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let settings = Settings::load(&cwd)?;
    let dir = store_dir(cli)?;

    // 1. Resolve and validate the share configuration before reading input.
    let config = settings.share_config(shares, threshold)?;

    // 2. Read the document text.
    let content = read_content(file)?;

    // 3. Generate the key, encrypt, split, and store.
    let store = DocumentStore::new(&dir);
    let mut session = KeySession::new();
    let body = DocumentBody::new(title, &content);
    let created = seal_document(&mut session, &store, &body, config)?;
    session.lock();

    output::success(&format!("Document created: {}", created.id));

    // 4. Show the keys. This is the only time they are ever printed.
    println!();
    output::warning("The master key and shares below are shown once and never stored.");
    println!(
        "{}",
        style("Master key (full access, keep it private):").bold()
    );
    println!("  {}", created.master_token.as_str());
    println!();
    println!(
        "{}",
        style(format!(
            "Key holder shares (any {} of {} unlock the document):",
            config.threshold(),
            config.total()
        ))
        .bold()
    );
    output::print_shares(&created.shares);
    println!();

    audit_event(
        &dir,
        "create",
        Some(&created.id),
        Some(&format!(
            "{} shares, threshold {}",
            config.total(),
            config.threshold()
        )),
    );

    output::tip("Give each share to a different key holder.");
    output::tip(&format!("Run `sharelock open {}` to read it with the master key.", created.id));
    output::tip(&format!("Run `sharelock unlock {}` to read it with shares.", created.id));

    Ok(())
}

/// Read the document text from `file`, or from stdin when no file is given.
fn read_content(file: Option<&str>) -> Result<Zeroizing<String>> {
    match file {
        Some(path) => Ok(Zeroizing::new(fs::read_to_string(path)?)),
        None => {
            let mut stdin = std::io::stdin();
            if stdin.is_terminal() {
                output::info("Type the document text, then press Ctrl-D.");
            }
            let mut content = Zeroizing::new(String::new());
            stdin.read_to_string(&mut *content)?;
            Ok(content)
        }
    }
}
