//! The vault gate: decides whether a candidate password opens a vault.
//!
//! ```text
//! UNVERIFIED ──salt missing──────────────▶ REJECTED
//!      │
//!      ├─ derive key, vault has no records ▶ EMPTY_VAULT_PASSTHROUGH
//!      ├─ probe record decrypts ──────────▶ VERIFIED
//!      └─ probe record fails auth ────────▶ REJECTED
//! ```
//!
//! An empty vault has no ciphertext to probe, so any password passes
//! until the first record pins the key.

use std::fmt;

use tracing::{debug, warn};

use crate::crypto::encryption::decrypt;
use crate::crypto::kdf::derive_key;
use crate::errors::{PwVaultError, Result};

use super::name::VaultName;
use super::record::RecordStore;
use super::salt::SaltStore;
use super::session::Session;

/// Why the gate refused a password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The vault has no recorded salt (never created, or corrupted).
    SaltNotFound,
    /// The derived key failed to authenticate the probe record.
    WrongPassword,
    /// The probe record is not a parseable ciphertext token.
    CorruptProbe,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SaltNotFound => "salt not found",
            Self::WrongPassword => "wrong password",
            Self::CorruptProbe => "corrupt probe record",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal gate state, without the session attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Verified,
    EmptyVaultPassthrough,
    Rejected,
}

/// The result of a gate check.
#[derive(Debug)]
pub enum GateResult {
    /// The key decrypted an existing record.
    Verified(Session),
    /// The vault is empty; the key could not be checked.
    EmptyVaultPassthrough(Session),
    Rejected(RejectReason),
}

impl GateResult {
    pub fn state(&self) -> GateState {
        match self {
            Self::Verified(_) => GateState::Verified,
            Self::EmptyVaultPassthrough(_) => GateState::EmptyVaultPassthrough,
            Self::Rejected(_) => GateState::Rejected,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// Take the session, or fail with `AccessDenied` if the gate rejected.
    pub fn into_session(self, vault: &VaultName) -> Result<Session> {
        match self {
            Self::Verified(session) | Self::EmptyVaultPassthrough(session) => Ok(session),
            Self::Rejected(_) => Err(PwVaultError::AccessDenied(vault.to_string())),
        }
    }
}

/// Run the gate for `vault` with a candidate password.
///
/// Storage failures propagate as errors; every authentication outcome
/// is returned as a `GateResult`.
pub fn check<S>(store: &S, actor: &str, vault: &VaultName, password: &[u8]) -> Result<GateResult>
where
    S: SaltStore + RecordStore + ?Sized,
{
    // 1. A missing salt fails closed; never provision one here.
    let stored = match store.get_salt(vault) {
        Ok(stored) => stored,
        Err(PwVaultError::SaltNotFound(_)) => {
            warn!(vault = %vault, "gate rejected: no salt recorded");
            return Ok(GateResult::Rejected(RejectReason::SaltNotFound));
        }
        Err(e) => return Err(e),
    };

    // 2. Derive the candidate key under the vault's own salt and params.
    let key = derive_key(password, &stored.salt, &stored.params)?;

    // 3. Probe one existing record, if there is one.
    let Some(probe) = store.probe_token(vault)? else {
        debug!(vault = %vault, "gate passthrough: vault is empty");
        return Ok(GateResult::EmptyVaultPassthrough(Session::new(
            actor,
            vault.clone(),
            key,
        )));
    };

    match decrypt(&key, &probe) {
        Ok(_plaintext) => {
            debug!(vault = %vault, "gate verified");
            Ok(GateResult::Verified(Session::new(actor, vault.clone(), key)))
        }
        Err(PwVaultError::AuthenticationFailure) => {
            warn!(vault = %vault, "gate rejected: wrong password");
            Ok(GateResult::Rejected(RejectReason::WrongPassword))
        }
        Err(PwVaultError::MalformedToken(_)) => {
            warn!(vault = %vault, "gate rejected: probe record is malformed");
            Ok(GateResult::Rejected(RejectReason::CorruptProbe))
        }
        Err(e) => Err(e),
    }
}
