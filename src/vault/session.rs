//! Authenticated vault sessions.

use std::fmt;

use crate::crypto::keys::DerivedKey;

use super::name::VaultName;

/// An open, authenticated view of one vault.
///
/// Only the gate and vault creation can build a `Session`, so holding
/// one proves the password was not rejected.  The key lives exactly as
/// long as the session and is wiped on drop.
pub struct Session {
    actor: String,
    vault: VaultName,
    key: DerivedKey,
}

impl Session {
    pub(crate) fn new(actor: &str, vault: VaultName, key: DerivedKey) -> Self {
        Self {
            actor: actor.to_string(),
            vault,
            key,
        }
    }

    /// Who opened the session (recorded in audit events).
    pub fn actor(&self) -> &str {
        &self.actor
    }

    pub fn vault(&self) -> &VaultName {
        &self.vault
    }

    pub(crate) fn key(&self) -> &DerivedKey {
        &self.key
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("actor", &self.actor)
            .field("vault", &self.vault)
            .field("key", &"[REDACTED]")
            .finish()
    }
}
