//! Credential records stored inside a vault.
//!
//! The service and account fields are plaintext metadata.  The password
//! is only ever held as a ciphertext token at rest; decrypted copies
//! live in `RevealedPassword`, which wipes itself on drop and never
//! prints its contents through `Debug`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use zeroize::Zeroizing;

use super::name::VaultName;
use crate::errors::Result;

/// A stored credential with its password still encrypted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub id: i64,
    pub service: String,
    pub account: String,
    /// Ciphertext token produced by `crypto::encrypt`.
    pub password_token: String,
    pub created_at: DateTime<Utc>,
}

/// A record about to be inserted (no id yet).
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub service: String,
    pub account: String,
    pub password_token: String,
    pub created_at: DateTime<Utc>,
}

/// Caller input for inserting a credential.
#[derive(Clone, Copy)]
pub struct NewCredential<'a> {
    pub service: &'a str,
    pub account: &'a str,
    pub password: &'a str,
}

/// Caller input for updating a credential.  `None` keeps the old value.
#[derive(Clone, Copy, Default)]
pub struct RecordUpdate<'a> {
    pub service: Option<&'a str>,
    pub account: Option<&'a str>,
    pub password: Option<&'a str>,
}

impl RecordUpdate<'_> {
    /// Returns `true` if no field would change.
    pub fn is_empty(&self) -> bool {
        self.service.is_none() && self.account.is_none() && self.password.is_none()
    }
}

/// Lightweight view of a record without any password material.
///
/// Returned by mutating operations so callers can redisplay the vault
/// without touching ciphertext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordMetadata {
    pub id: i64,
    pub service: String,
    pub account: String,
    pub created_at: DateTime<Utc>,
}

impl From<&CredentialRecord> for RecordMetadata {
    fn from(record: &CredentialRecord) -> Self {
        Self {
            id: record.id,
            service: record.service.clone(),
            account: record.account.clone(),
            created_at: record.created_at,
        }
    }
}

/// The outcome of decrypting one record's password.
pub enum RevealedPassword {
    Plaintext(Zeroizing<String>),
    /// The token did not decrypt under the session key.
    Undecryptable,
}

impl RevealedPassword {
    pub fn as_plaintext(&self) -> Option<&str> {
        match self {
            Self::Plaintext(text) => Some(text.as_str()),
            Self::Undecryptable => None,
        }
    }

    pub fn is_undecryptable(&self) -> bool {
        matches!(self, Self::Undecryptable)
    }
}

impl fmt::Debug for RevealedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plaintext(_) => f.write_str("Plaintext([REDACTED])"),
            Self::Undecryptable => f.write_str("Undecryptable"),
        }
    }
}

impl Serialize for RevealedPassword {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Plaintext(text) => serializer.serialize_some(text.as_str()),
            Self::Undecryptable => serializer.serialize_none(),
        }
    }
}

/// A record with its password decrypted for display.
#[derive(Debug, Serialize)]
pub struct DecryptedRecord {
    pub id: i64,
    pub service: String,
    pub account: String,
    pub password: RevealedPassword,
    pub created_at: DateTime<Utc>,
}

/// Persisted credential records, partitioned by vault name.
///
/// Implementations surface storage failures as errors and never retry.
pub trait RecordStore {
    /// The token of one existing record (lowest id), used to probe a
    /// candidate key.  `None` for an empty vault.
    fn probe_token(&self, vault: &VaultName) -> Result<Option<String>>;

    /// Insert a record and return its id.
    fn insert_record(&self, vault: &VaultName, record: &NewRecord) -> Result<i64>;

    /// Find the record for `service`, if any.
    fn find_record(&self, vault: &VaultName, service: &str) -> Result<Option<CredentialRecord>>;

    /// Overwrite service, account, and token of the record with `record.id`.
    fn update_record(&self, vault: &VaultName, record: &CredentialRecord) -> Result<()>;

    /// Delete a record by id.  Returns `false` if it did not exist.
    fn delete_record(&self, vault: &VaultName, id: i64) -> Result<bool>;

    /// All records of `vault`, ordered by id.
    fn list_records(&self, vault: &VaultName) -> Result<Vec<CredentialRecord>>;

    /// Delete every record of `vault` together with its salt, returning
    /// how many records were removed.
    ///
    /// Both deletions happen in one transaction: if either fails, the
    /// vault is left exactly as it was.
    fn purge_vault(&self, vault: &VaultName) -> Result<usize>;

    fn count_records(&self, vault: &VaultName) -> Result<usize>;
}
