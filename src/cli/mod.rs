//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::crypto::master_key;
use crate::errors::{Result, ShareLockError};

/// Environment variable checked for the master key before prompting.
pub const MASTER_KEY_ENV: &str = "SHARELOCK_MASTER_KEY";

/// ShareLock CLI: encrypted documents unlocked by a master key or K-of-N shares.
#[derive(Parser)]
#[command(
    name = "sharelock",
    about = "Encrypted documents with threshold key sharing",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Document store directory (default: `store_dir` from .sharelock.toml, else .sharelock)
    #[arg(long, global = true)]
    pub store_dir: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Encrypt a new document and print its master key and shares
    Create {
        /// Document title (stored in the clear)
        #[arg(short, long)]
        title: String,

        /// File with the document text (reads stdin if omitted)
        #[arg(short, long)]
        file: Option<String>,

        /// Number of key holder shares to issue (2-20)
        #[arg(long)]
        shares: Option<u8>,

        /// Shares needed to unlock (at least 2)
        #[arg(long)]
        threshold: Option<u8>,
    },

    /// Decrypt a document with its master key
    Open {
        /// Document id
        id: String,
    },

    /// Decrypt a document by combining key holder shares
    Unlock {
        /// Document id
        id: String,

        /// A share token (sk_...); repeat for each share
        #[arg(short, long = "share")]
        shares: Vec<String>,
    },

    /// Issue a fresh set of shares for a document (requires the master key)
    Reshare {
        /// Document id
        id: String,
    },

    /// List stored documents (metadata only)
    List,

    /// View the audit log of document operations
    #[cfg(feature = "audit-log")]
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
    },

    /// Show version
    Version,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Resolve the store directory: `--store-dir`, then settings, then default.
pub fn store_dir(cli: &Cli) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    match &cli.store_dir {
        Some(dir) => Ok(cwd.join(dir)),
        None => Ok(Settings::load(&cwd)?.store_path(&cwd)),
    }
}

/// Get the master key, trying in order:
/// 1. `SHARELOCK_MASTER_KEY` env var (scripts/CI)
/// 2. Interactive hidden prompt
///
/// The token is format-checked before any decryption is attempted.
pub fn prompt_master_key() -> Result<Zeroizing<String>> {
    let raw = match std::env::var(MASTER_KEY_ENV) {
        Ok(value) if !value.trim().is_empty() => Zeroizing::new(value),
        _ => {
            let value = dialoguer::Password::new()
                .with_prompt("Enter master key (mk_...)")
                .interact()
                .map_err(|e| ShareLockError::CommandFailed(format!("master key prompt: {e}")))?;
            Zeroizing::new(value)
        }
    };

    let token = Zeroizing::new(raw.trim().to_string());
    if !master_key::is_valid(&token) {
        return Err(ShareLockError::InvalidFormat(
            "invalid master key format".into(),
        ));
    }
    Ok(token)
}

/// Gather share tokens from flags, prompting for more on a terminal until
/// `needed` are present.  Blank entries are dropped.
pub fn collect_shares(provided: &[String], needed: usize) -> Result<Zeroizing<Vec<String>>> {
    let mut shares: Zeroizing<Vec<String>> = Zeroizing::new(
        provided
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
    );

    if shares.len() >= needed || !std::io::stdin().is_terminal() {
        return Ok(shares);
    }

    output::info(&format!(
        "Enter {} more share(s) to reach the threshold of {needed}.",
        needed - shares.len()
    ));
    while shares.len() < needed {
        let value = Zeroizing::new(
            dialoguer::Password::new()
                .with_prompt(format!("Share {}", shares.len() + 1))
                .interact()
                .map_err(|e| ShareLockError::CommandFailed(format!("share prompt: {e}")))?,
        );
        let trimmed = value.trim();
        if trimmed.is_empty() {
            continue;
        }
        shares.push(trimmed.to_string());
    }

    Ok(shares)
}

/// Record an operation in the audit log, if compiled in.
pub fn audit_event(store_dir: &Path, op: &str, document_id: Option<&str>, details: Option<&str>) {
    #[cfg(feature = "audit-log")]
    crate::audit::log_audit(store_dir, op, document_id, details);

    #[cfg(not(feature = "audit-log"))]
    let _ = (store_dir, op, document_id, details);
}
