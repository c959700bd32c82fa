//! High-level vault operations used by CLI commands.
//!
//! `VaultManager` wires a store, an audit sink, and the configured KDF
//! parameters together so that the rest of the application can work
//! with simple calls like `manager.open_session("alice", &name, pw)`.

use tracing::info;

use crate::audit::{AuditAction, AuditEvent, AuditSink, Outcome};
use crate::crypto::kdf::Argon2Params;
use crate::errors::{PwVaultError, Result};

use super::gate::{self, GateResult};
use super::name::VaultName;
use super::ops;
use super::record::{DecryptedRecord, NewCredential, RecordMetadata, RecordStore, RecordUpdate};
use super::salt::{create_vault_salt, SaltStore};
use super::session::Session;

/// The main vault handle.
pub struct VaultManager<S, A> {
    store: S,
    audit: A,
    /// Argon2 parameters for newly created vaults.
    params: Argon2Params,
}

impl<S, A> VaultManager<S, A>
where
    S: SaltStore + RecordStore,
    A: AuditSink,
{
    pub fn new(store: S, audit: A, params: Argon2Params) -> Self {
        Self {
            store,
            audit,
            params,
        }
    }

    // ------------------------------------------------------------------
    // Vault lifecycle
    // ------------------------------------------------------------------

    /// Create a new, empty vault protected by `password`.
    ///
    /// Generates and stores the vault's salt, then returns a session for
    /// immediate use (the vault is empty, so this is a passthrough).
    pub fn create_vault(&self, actor: &str, vault: &VaultName, password: &[u8]) -> Result<Session> {
        if password.is_empty() {
            return Err(PwVaultError::EmptyPassword);
        }

        let key = match create_vault_salt(&self.store, vault, password, &self.params) {
            Ok(key) => key,
            Err(PwVaultError::SaltAlreadyExists(name)) => {
                return Err(PwVaultError::VaultAlreadyExists(name));
            }
            Err(e) => return Err(e),
        };

        info!(vault = %vault, actor, "vault created");
        self.audit.record(&AuditEvent::new(
            actor,
            Some(vault.as_str()),
            AuditAction::CreateVault,
            Outcome::Success,
        ));

        Ok(Session::new(actor, vault.clone(), key))
    }

    /// Delete a vault and all of its records.
    ///
    /// The password must pass the gate first.  Returns the number of
    /// records removed.
    pub fn delete_vault(&self, actor: &str, vault: &VaultName, password: &[u8]) -> Result<usize> {
        let session = self.open_session(actor, vault, password)?;

        let removed = self.store.purge_vault(session.vault())?;

        info!(vault = %vault, actor, removed, "vault deleted");
        self.audit.record(
            &AuditEvent::new(
                actor,
                Some(vault.as_str()),
                AuditAction::DeleteVault,
                Outcome::Success,
            )
            .with_detail(format!("{removed} record(s) removed")),
        );

        Ok(removed)
    }

    /// Names of all vaults in the store.
    pub fn list_vaults(&self) -> Result<Vec<VaultName>> {
        self.store.vault_names()
    }

    // ------------------------------------------------------------------
    // Gate
    // ------------------------------------------------------------------

    /// Run the gate and audit the outcome.
    pub fn check_gate(&self, actor: &str, vault: &VaultName, password: &[u8]) -> Result<GateResult> {
        let result = gate::check(&self.store, actor, vault, password)?;

        let event = match &result {
            GateResult::Rejected(reason) => AuditEvent::new(
                actor,
                Some(vault.as_str()),
                AuditAction::Access,
                Outcome::Failed,
            )
            .with_detail(reason.as_str()),
            GateResult::Verified(_) => AuditEvent::new(
                actor,
                Some(vault.as_str()),
                AuditAction::Access,
                Outcome::Success,
            ),
            GateResult::EmptyVaultPassthrough(_) => AuditEvent::new(
                actor,
                Some(vault.as_str()),
                AuditAction::Access,
                Outcome::Success,
            )
            .with_detail("empty vault"),
        };
        self.audit.record(&event);

        Ok(result)
    }

    /// Run the gate and return the session, or `AccessDenied`.
    pub fn open_session(&self, actor: &str, vault: &VaultName, password: &[u8]) -> Result<Session> {
        self.check_gate(actor, vault, password)?.into_session(vault)
    }

    // ------------------------------------------------------------------
    // Record operations
    // ------------------------------------------------------------------

    pub fn insert(&self, session: &Session, credential: &NewCredential<'_>) -> Result<Vec<RecordMetadata>> {
        ops::insert(&self.store, &self.audit, session, credential)
    }

    pub fn update(
        &self,
        session: &Session,
        target_service: &str,
        changes: &RecordUpdate<'_>,
    ) -> Result<Vec<RecordMetadata>> {
        ops::update(&self.store, &self.audit, session, target_service, changes)
    }

    pub fn delete(&self, session: &Session, target_service: &str) -> Result<Vec<RecordMetadata>> {
        ops::delete(&self.store, &self.audit, session, target_service)
    }

    pub fn list_decrypted(&self, session: &Session) -> Result<Vec<DecryptedRecord>> {
        ops::list_decrypted(&self.store, session)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn audit(&self) -> &A {
        &self.audit
    }
}
