//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.  Tokens are printed bare on
//! their own lines so they can be copied or scripted.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::store::DocumentRecord;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print numbered share tokens, one per line.
pub fn print_shares(shares: &[String]) {
    for (i, share) in shares.iter().enumerate() {
        println!("  {} {}", style(format!("{:>2}.", i + 1)).dim(), share);
    }
}

/// Print a table of document metadata (Id, Title, Shares, Created).
pub fn print_documents_table(documents: &[DocumentRecord]) {
    if documents.is_empty() {
        info("No documents in this store yet.");
        tip("Run `sharelock create --title <TITLE>` to encrypt your first document.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Title", "Unlock", "Created"]);

    for d in documents {
        table.add_row(vec![
            d.id.clone(),
            d.title.clone(),
            format!("{} of {}", d.threshold, d.total_shares),
            d.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ]);
    }

    println!("{table}");
}
