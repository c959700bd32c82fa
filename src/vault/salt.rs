//! Per-vault salt persistence.
//!
//! Each vault has exactly one salt, written when the vault is created
//! and read back on every later key derivation.  The Argon2 parameters
//! in effect at creation are stored beside it so the same derivation
//! is reproduced regardless of later config changes.

use crate::crypto::kdf::{derive_key_with_fresh_salt, Argon2Params, Salt};
use crate::crypto::keys::DerivedKey;
use crate::errors::Result;

use super::name::VaultName;

/// The salt and KDF parameters recorded for one vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoredSalt {
    pub salt: Salt,
    pub params: Argon2Params,
}

/// Persisted vault-name → salt mapping.
pub trait SaltStore {
    /// Fetch the salt for `vault`.
    ///
    /// Fails with `SaltNotFound` if the vault was never created.
    fn get_salt(&self, vault: &VaultName) -> Result<StoredSalt>;

    /// Record the salt for a new vault.
    ///
    /// Fails with `SaltAlreadyExists` if one is already recorded; a
    /// vault's salt is never replaced.
    fn put_salt(&self, vault: &VaultName, salt: &StoredSalt) -> Result<()>;

    /// All vault names with a recorded salt, sorted.
    fn vault_names(&self) -> Result<Vec<VaultName>>;
}

/// Generate and persist the salt for a brand-new vault.
///
/// Returns the key derived under that salt so the creator can start a
/// session without deriving twice.
pub fn create_vault_salt<S: SaltStore + ?Sized>(
    store: &S,
    vault: &VaultName,
    password: &[u8],
    params: &Argon2Params,
) -> Result<DerivedKey> {
    let (key, salt) = derive_key_with_fresh_salt(password, params)?;
    store.put_salt(
        vault,
        &StoredSalt {
            salt,
            params: *params,
        },
    )?;
    Ok(key)
}
