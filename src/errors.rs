use thiserror::Error;

/// All errors that can occur in pwvault.
///
/// None of the messages carry plaintext passwords or key material.
#[derive(Debug, Error)]
pub enum PwVaultError {
    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Authentication failed — wrong key or corrupted ciphertext")]
    AuthenticationFailure,

    #[error("Malformed ciphertext token: {0}")]
    MalformedToken(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Salt store errors ---
    #[error("Vault '{0}' not found (no salt recorded)")]
    SaltNotFound(String),

    #[error("Vault '{0}' already has a salt")]
    SaltAlreadyExists(String),

    // --- Vault errors ---
    #[error("Vault '{0}' already exists")]
    VaultAlreadyExists(String),

    #[error("Invalid vault name: {0}")]
    InvalidVaultName(String),

    #[error("Access to vault '{0}' denied")]
    AccessDenied(String),

    #[error("Vault password cannot be empty")]
    EmptyPassword,

    // --- Record errors ---
    #[error("No entry for service '{service}' in vault '{vault}'")]
    RecordNotFound { vault: String, service: String },

    #[error("Service '{service}' already exists in vault '{vault}' (use `update`)")]
    DuplicateService { vault: String, service: String },

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    // --- Password utilities ---
    #[error("Invalid generator options: {0}")]
    InvalidGeneratorOptions(String),

    // --- Storage errors ---
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Audit error: {0}")]
    AuditError(String),

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
}

/// Convenience type alias for pwvault results.
pub type Result<T> = std::result::Result<T, PwVaultError>;
