//! Credential record operations.
//!
//! Every operation takes a `Session`, which only a non-rejected gate can
//! produce, so a wrong password never reaches a write.  Passwords are
//! encrypted with the session key on the way in and are never logged.

use chrono::Utc;
use tracing::info;

use crate::audit::{AuditAction, AuditEvent, AuditSink, Outcome};
use crate::crypto::encryption::{decrypt_string, encrypt};
use crate::errors::{PwVaultError, Result};

use super::record::{
    DecryptedRecord, NewCredential, NewRecord, RecordMetadata, RecordStore, RecordUpdate,
    RevealedPassword,
};
use super::session::Session;

/// Encrypt and append a credential, returning the vault's records.
///
/// Fails with `DuplicateService` if the service is already present.
pub fn insert<S, A>(
    store: &S,
    audit: &A,
    session: &Session,
    credential: &NewCredential<'_>,
) -> Result<Vec<RecordMetadata>>
where
    S: RecordStore + ?Sized,
    A: AuditSink + ?Sized,
{
    let vault = session.vault();
    let service = require_non_empty("service", credential.service)?;
    let account = require_non_empty("account", credential.account)?;

    if store.find_record(vault, service)?.is_some() {
        return Err(PwVaultError::DuplicateService {
            vault: vault.to_string(),
            service: service.to_string(),
        });
    }

    let password_token = encrypt(session.key(), credential.password.as_bytes())?;

    store.insert_record(
        vault,
        &NewRecord {
            service: service.to_string(),
            account: account.to_string(),
            password_token,
            created_at: Utc::now(),
        },
    )?;

    info!(vault = %vault, service, "credential inserted");
    audit.record(
        &AuditEvent::new(
            session.actor(),
            Some(vault.as_str()),
            AuditAction::Insert,
            Outcome::Success,
        )
        .with_detail(service),
    );

    list_metadata(store, session)
}

/// Change any of service, account, or password of the record for
/// `target_service`.
///
/// Fields left as `None` keep their stored value; in particular an
/// unchanged password keeps its existing ciphertext untouched.  An
/// update that changes nothing fails with `InvalidRecord`.
pub fn update<S, A>(
    store: &S,
    audit: &A,
    session: &Session,
    target_service: &str,
    changes: &RecordUpdate<'_>,
) -> Result<Vec<RecordMetadata>>
where
    S: RecordStore + ?Sized,
    A: AuditSink + ?Sized,
{
    let vault = session.vault();
    if changes.is_empty() {
        return Err(PwVaultError::InvalidRecord("nothing to update".into()));
    }

    let target_service = target_service.trim();
    let mut record = store
        .find_record(vault, target_service)?
        .ok_or_else(|| PwVaultError::RecordNotFound {
            vault: vault.to_string(),
            service: target_service.to_string(),
        })?;

    if let Some(new_service) = changes.service {
        let new_service = require_non_empty("service", new_service)?;
        if new_service != record.service && store.find_record(vault, new_service)?.is_some() {
            return Err(PwVaultError::DuplicateService {
                vault: vault.to_string(),
                service: new_service.to_string(),
            });
        }
        record.service = new_service.to_string();
    }

    if let Some(new_account) = changes.account {
        record.account = require_non_empty("account", new_account)?.to_string();
    }

    if let Some(new_password) = changes.password {
        record.password_token = encrypt(session.key(), new_password.as_bytes())?;
    }

    store.update_record(vault, &record)?;

    info!(vault = %vault, from = target_service, to = %record.service, "credential updated");
    audit.record(
        &AuditEvent::new(
            session.actor(),
            Some(vault.as_str()),
            AuditAction::Update,
            Outcome::Success,
        )
        .with_detail(record.service.as_str()),
    );

    list_metadata(store, session)
}

/// Remove the record for `target_service`.
pub fn delete<S, A>(
    store: &S,
    audit: &A,
    session: &Session,
    target_service: &str,
) -> Result<Vec<RecordMetadata>>
where
    S: RecordStore + ?Sized,
    A: AuditSink + ?Sized,
{
    let vault = session.vault();
    let target_service = target_service.trim();
    let not_found = || PwVaultError::RecordNotFound {
        vault: vault.to_string(),
        service: target_service.to_string(),
    };

    let record = store.find_record(vault, target_service)?.ok_or_else(not_found)?;
    if !store.delete_record(vault, record.id)? {
        return Err(not_found());
    }

    info!(vault = %vault, service = target_service, "credential deleted");
    audit.record(
        &AuditEvent::new(
            session.actor(),
            Some(vault.as_str()),
            AuditAction::Delete,
            Outcome::Success,
        )
        .with_detail(target_service),
    );

    list_metadata(store, session)
}

/// Decrypt every record of the session's vault for display.
///
/// A record that fails to decrypt is reported as `Undecryptable`; the
/// rest of the listing is still returned.
pub fn list_decrypted<S>(store: &S, session: &Session) -> Result<Vec<DecryptedRecord>>
where
    S: RecordStore + ?Sized,
{
    let records = store.list_records(session.vault())?;

    Ok(records
        .into_iter()
        .map(|record| {
            let password = match decrypt_string(session.key(), &record.password_token) {
                Ok(plaintext) => RevealedPassword::Plaintext(plaintext),
                Err(_) => RevealedPassword::Undecryptable,
            };
            DecryptedRecord {
                id: record.id,
                service: record.service,
                account: record.account,
                password,
                created_at: record.created_at,
            }
        })
        .collect())
}

/// Metadata for every record of the session's vault (no decryption).
pub fn list_metadata<S>(store: &S, session: &Session) -> Result<Vec<RecordMetadata>>
where
    S: RecordStore + ?Sized,
{
    Ok(store
        .list_records(session.vault())?
        .iter()
        .map(RecordMetadata::from)
        .collect())
}

fn require_non_empty<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PwVaultError::InvalidRecord(format!("{field} cannot be empty")));
    }
    Ok(trimmed)
}
