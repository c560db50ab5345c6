use thiserror::Error;

/// All errors that can occur in ShareLock.
#[derive(Debug, Error)]
pub enum ShareLockError {
    // --- Token / key errors ---
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("Invalid share configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Need at least {needed} shares, got {got}")]
    InsufficientShares { needed: usize, got: usize },

    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Deliberately generic: never reveals whether the key, a share, or
    /// the ciphertext was at fault.
    #[error("Decryption failed — wrong key, wrong shares, or corrupted data")]
    AuthenticationFailure,

    // --- Session errors ---
    #[error("Document key is locked — unlock with a master key or shares first")]
    NotUnlocked,

    // --- Store errors ---
    #[error("Document '{0}' not found")]
    DocumentNotFound(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Audit error: {0}")]
    AuditError(String),
}

/// Convenience type alias for ShareLock results.
pub type Result<T> = std::result::Result<T, ShareLockError>;
