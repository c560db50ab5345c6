//! Filesystem-backed document store.
//!
//! Each record is a JSON file at `<root>/documents/<id>.json`.  Writes go
//! to a temp file in the same directory and are renamed into place so a
//! reader never sees a half-written record.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use rand::rngs::OsRng;
use rand::RngCore;

use super::record::{DocumentRecord, NewDocument};
use crate::errors::{Result, ShareLockError};

/// Random bytes in a document id (rendered as lowercase hex).
const ID_BYTES: usize = 16;

/// Directory under the store root that holds the record files.
const DOCUMENTS_DIR: &str = "documents";

/// Handle on a store directory.  Cheap to build; touches disk lazily.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The store root (e.g. `.sharelock`).
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validate and persist a new document, returning its id.
    pub fn create(&self, doc: NewDocument) -> Result<String> {
        doc.validate()?;

        let dir = self.documents_dir();
        fs::create_dir_all(&dir)?;

        let id = generate_id();
        let record = DocumentRecord {
            id: id.clone(),
            title: doc.title,
            encrypted_content: doc.encrypted_content,
            iv: doc.iv,
            total_shares: doc.total_shares,
            threshold: doc.threshold,
            created_at: Utc::now(),
        };

        let bytes = serde_json::to_vec_pretty(&record)
            .map_err(|e| ShareLockError::SerializationError(format!("document: {e}")))?;
        write_atomic(&dir.join(format!("{id}.json")), &bytes)?;

        Ok(id)
    }

    /// Look up a document.  Unknown or malformed ids are `None`, not errors.
    pub fn get(&self, id: &str) -> Result<Option<DocumentRecord>> {
        if !is_valid_id(id) {
            return Ok(None);
        }

        let path = self.documents_dir().join(format!("{id}.json"));
        if !path.exists() {
            return Ok(None);
        }

        read_record(&path).map(Some)
    }

    /// All documents, newest first.
    pub fn list(&self) -> Result<Vec<DocumentRecord>> {
        let dir = self.documents_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            let is_record = path.extension().is_some_and(|ext| ext == "json")
                && path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .is_some_and(is_valid_id);
            if is_record {
                records.push(read_record(&path)?);
            }
        }

        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    fn documents_dir(&self) -> PathBuf {
        self.root.join(DOCUMENTS_DIR)
    }
}

fn read_record(path: &Path) -> Result<DocumentRecord> {
    let data = fs::read(path)?;
    serde_json::from_slice(&data).map_err(|e| {
        ShareLockError::InvalidDocument(format!("{}: {e}", path.display()))
    })
}

/// Temp file + rename, owner-only permissions on Unix.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = path.parent().unwrap_or(Path::new("."));
    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    fs::write(&tmp_path, bytes)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&tmp_path, fs::Permissions::from_mode(0o600))?;
    }

    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn generate_id() -> String {
    let mut bytes = [0u8; ID_BYTES];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Ids are exactly `2 * ID_BYTES` lowercase hex digits, which also keeps
/// them from escaping the documents directory.
fn is_valid_id(id: &str) -> bool {
    id.len() == ID_BYTES * 2
        && id
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn new_doc(title: &str) -> NewDocument {
        NewDocument {
            title: title.into(),
            encrypted_content: "c2VjcmV0".into(),
            iv: "AAAAAAAAAAAAAAAA".into(),
            total_shares: 5,
            threshold: 3,
        }
    }

    #[test]
    fn create_then_get() {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::new(dir.path());

        let id = store.create(new_doc("Plan")).unwrap();
        assert!(is_valid_id(&id));

        let record = store.get(&id).unwrap().expect("record exists");
        assert_eq!(record.id, id);
        assert_eq!(record.title, "Plan");
        assert_eq!(record.encrypted_content, "c2VjcmV0");
        assert_eq!(record.total_shares, 5);
        assert_eq!(record.threshold, 3);
    }

    #[test]
    fn get_unknown_is_none() {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::new(dir.path());
        assert!(store.get(&"0".repeat(32)).unwrap().is_none());
    }

    #[test]
    fn get_malformed_id_is_none() {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::new(dir.path());
        assert!(store.get("../../etc/passwd").unwrap().is_none());
        assert!(store.get("").unwrap().is_none());
        assert!(store.get(&"G".repeat(32)).unwrap().is_none());
    }

    #[test]
    fn create_rejects_invalid_input_without_writing() {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::new(dir.path());

        let result = store.create(NewDocument {
            total_shares: 25,
            ..new_doc("Too many")
        });
        assert!(matches!(result, Err(ShareLockError::InvalidDocument(_))));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn list_is_newest_first() {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::new(dir.path());

        let first = store.create(new_doc("first")).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = store.create(new_doc("second")).unwrap();

        let ids: Vec<String> = store.list().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![second, first]);
    }

    #[test]
    fn list_on_missing_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::new(dir.path().join("nope"));
        assert!(store.list().unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn record_files_are_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = DocumentStore::new(dir.path());
        let id = store.create(new_doc("perm")).unwrap();

        let path = dir.path().join("documents").join(format!("{id}.json"));
        let mode = fs::metadata(path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
