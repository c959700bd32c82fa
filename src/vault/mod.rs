//! Vault module — the encrypted credential store.
//!
//! This module provides:
//! - Validated vault names (`name`)
//! - The salt store contract and vault salt creation (`salt`)
//! - Credential record types and the record store contract (`record`)
//! - The SQLite implementation of both stores (`store`)
//! - The password gate and authenticated sessions (`gate`, `session`)
//! - Record insert/update/delete/list (`ops`)
//! - The `VaultManager` facade used by the CLI (`manager`)

pub mod gate;
pub mod manager;
pub mod name;
pub mod ops;
pub mod record;
pub mod salt;
pub mod session;
pub mod store;

// Re-export the most commonly used items.
pub use gate::{GateResult, GateState, RejectReason};
pub use manager::VaultManager;
pub use name::VaultName;
pub use record::{
    CredentialRecord, DecryptedRecord, NewCredential, RecordMetadata, RecordStore, RecordUpdate,
    RevealedPassword,
};
pub use salt::{create_vault_salt, SaltStore, StoredSalt};
pub use session::Session;
pub use store::SqliteStore;
