//! Document store — ciphertext and metadata only.
//!
//! This module provides:
//! - `DocumentRecord` / `NewDocument` and their validation (`record`)
//! - `DocumentStore`, a JSON-file store with atomic writes (`disk`)

pub mod disk;
pub mod record;

pub use disk::DocumentStore;
pub use record::{DocumentRecord, NewDocument};
