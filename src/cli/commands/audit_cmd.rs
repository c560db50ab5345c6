//! `sharelock audit` — display the audit log.
//!
//! Usage:
//!   sharelock audit               # show last 50 entries
//!   sharelock audit --last 20     # show last 20
//!   sharelock audit --since 7d    # entries from last 7 days

use chrono::{DateTime, Duration, Utc};

use crate::audit::{AuditEntry, AuditLog};
use crate::cli::{output, store_dir, Cli};
use crate::errors::{Result, ShareLockError};

/// Execute the `audit` command.
pub fn execute(cli: &Cli, last: usize, since: Option<&str>) -> Result<()> {
    let dir = store_dir(cli)?;
    if !dir.exists() {
        output::info("No document store found.");
        output::tip("Run `sharelock create --title <TITLE>` to create one.");
        return Ok(());
    }

    let audit = AuditLog::open(&dir)
        .ok_or_else(|| ShareLockError::AuditError("failed to open audit database".into()))?;

    let since_dt = match since {
        Some(s) => Some(parse_duration(s)?),
        None => None,
    };

    let entries = audit.query(last, since_dt)?;

    if entries.is_empty() {
        output::info("No audit entries found.");
        return Ok(());
    }

    print_audit_table(&entries);

    Ok(())
}

/// Parse a human-friendly duration like "7d", "24h", or "30m" into the
/// instant that long ago.
fn parse_duration(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();
    let invalid = || {
        ShareLockError::CommandFailed(format!(
            "invalid duration '{input}', use a form like 7d, 24h, or 30m"
        ))
    };

    let split = input
        .len()
        .checked_sub(1)
        .filter(|&i| input.is_char_boundary(i))
        .ok_or_else(invalid)?;
    let (amount, unit) = input.split_at(split);
    let amount: i64 = amount.parse().map_err(|_| invalid())?;

    let duration = match unit {
        "d" => Duration::try_days(amount),
        "h" => Duration::try_hours(amount),
        "m" => Duration::try_minutes(amount),
        _ => return Err(invalid()),
    }
    .ok_or_else(invalid)?;

    Utc::now().checked_sub_signed(duration).ok_or_else(invalid)
}

/// Print audit entries in a formatted table.
pub fn print_audit_table(entries: &[AuditEntry]) {
    use comfy_table::{ContentArrangement, Table};
    use console::style;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Operation", "Document", "Details"]);

    for entry in entries {
        let time = entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string();
        let op = colorize_operation(&entry.operation);
        let document = entry.document_id.as_deref().unwrap_or("-");
        let details = entry.details.as_deref().unwrap_or("-");

        table.add_row(vec![time, op, document.to_string(), details.to_string()]);
    }

    println!(
        "{}",
        style(format!("{} audit entries:", entries.len())).bold()
    );
    println!("{table}");
}

/// Colorize operation names for display.
fn colorize_operation(op: &str) -> String {
    use console::style;

    match op {
        "create" => style(op).green().to_string(),
        "open" => style(op).blue().to_string(),
        "unlock" => style(op).cyan().to_string(),
        "reshare" => style(op).yellow().to_string(),
        _ => op.to_string(),
    }
}
