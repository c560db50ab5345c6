//! Document operation history in SQLite.
//!
//! `<store_dir>/audit.db` gets one row per `create`, `open`, `unlock`, or
//! `reshare`, with the document id and a short note such as
//! "3 shares" or "decryption failed".  Master keys, shares, and document
//! text have no column here and are never passed in.
//!
//! Logging is best effort: a store whose database cannot be opened or
//! written still works, it just has no history.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};

use crate::errors::{Result, ShareLockError};

const DB_FILE: &str = "audit.db";

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS audit_log (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp   TEXT NOT NULL,
    operation   TEXT NOT NULL,
    document_id TEXT,
    details     TEXT
);";

/// One recorded operation.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub operation: String,
    pub document_id: Option<String>,
    pub details: Option<String>,
}

/// Handle on a store's audit database.
pub struct AuditLog {
    conn: Connection,
}

impl AuditLog {
    /// Open the database next to the documents, creating it if needed.
    ///
    /// `None` means history is unavailable for this store (missing
    /// directory, unreadable file); callers carry on without it.
    pub fn open(store_dir: &Path) -> Option<Self> {
        let path = Self::db_path(store_dir);
        let conn = Connection::open(&path).ok()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600));
        }

        conn.execute_batch(SCHEMA).ok()?;
        Some(Self { conn })
    }

    /// Append an entry.  Write errors are dropped.
    pub fn log(&self, operation: &str, document_id: Option<&str>, details: Option<&str>) {
        let _ = self.conn.execute(
            "INSERT INTO audit_log (timestamp, operation, document_id, details)
             VALUES (?1, ?2, ?3, ?4)",
            params![Utc::now().to_rfc3339(), operation, document_id, details],
        );
    }

    /// Up to `limit` entries, newest first, optionally only those at or
    /// after `since`.
    pub fn query(&self, limit: usize, since: Option<DateTime<Utc>>) -> Result<Vec<AuditEntry>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let since = since.map(|ts| ts.to_rfc3339());

        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, timestamp, operation, document_id, details
                 FROM audit_log
                 WHERE ?1 IS NULL OR timestamp >= ?1
                 ORDER BY id DESC
                 LIMIT ?2",
            )
            .map_err(|e| ShareLockError::AuditError(format!("prepare: {e}")))?;

        let rows = stmt
            .query_map(params![since, limit], entry_from_row)
            .map_err(|e| ShareLockError::AuditError(format!("query: {e}")))?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| ShareLockError::AuditError(format!("read row: {e}")))
    }

    pub fn db_path(store_dir: &Path) -> PathBuf {
        store_dir.join(DB_FILE)
    }
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<AuditEntry> {
    let raw: String = row.get(1)?;
    let timestamp = DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;

    Ok(AuditEntry {
        id: row.get(0)?,
        timestamp,
        operation: row.get(2)?,
        document_id: row.get(3)?,
        details: row.get(4)?,
    })
}

/// Record one operation against the store at `store_dir`, if its history
/// can be opened.  Never fails the caller.
pub fn log_audit(store_dir: &Path, op: &str, document_id: Option<&str>, details: Option<&str>) {
    if let Some(audit) = AuditLog::open(store_dir) {
        audit.log(op, document_id, details);
    }
}
