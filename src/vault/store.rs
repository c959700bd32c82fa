//! SQLite-backed salt and record store.
//!
//! `SqliteStore` implements both `SaltStore` and `RecordStore` over a
//! single connection.  All credential rows live in one `credentials`
//! table keyed by vault name, so no statement is ever built from a
//! vault name; every value is bound as a parameter.
//!
//! ```text
//! vault_salts(vault_name PK, salt, memory_kib, iterations, parallelism, created_at)
//! credentials(id PK, vault_name -> vault_salts, service, account, password, created_at)
//! ```

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use crate::crypto::kdf::{Argon2Params, Salt};
use crate::errors::{PwVaultError, Result};

use super::name::VaultName;
use super::record::{CredentialRecord, NewRecord, RecordStore};
use super::salt::{SaltStore, StoredSalt};

const SCHEMA: &str = "
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS vault_salts (
        vault_name  TEXT PRIMARY KEY,
        salt        BLOB NOT NULL,
        memory_kib  INTEGER NOT NULL,
        iterations  INTEGER NOT NULL,
        parallelism INTEGER NOT NULL,
        created_at  TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS credentials (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        vault_name  TEXT NOT NULL REFERENCES vault_salts(vault_name),
        service     TEXT NOT NULL,
        account     TEXT NOT NULL,
        password    TEXT NOT NULL,
        created_at  TEXT NOT NULL,
        UNIQUE (vault_name, service)
    );
";

/// The relational store behind every vault.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the store database at `path`.
    ///
    /// Creates the parent directory if needed and restricts the file to
    /// owner-only access on Unix.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        }

        Self::from_connection(conn)
    }

    /// Open a throwaway in-memory store (used by tests).
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }
}

// ---------------------------------------------------------------------------
// Salt store
// ---------------------------------------------------------------------------

impl SaltStore for SqliteStore {
    fn get_salt(&self, vault: &VaultName) -> Result<StoredSalt> {
        let row = self
            .conn
            .query_row(
                "SELECT salt, memory_kib, iterations, parallelism
                 FROM vault_salts WHERE vault_name = ?1",
                params![vault.as_str()],
                |row| {
                    Ok((
                        row.get::<_, Vec<u8>>(0)?,
                        Argon2Params {
                            memory_kib: row.get(1)?,
                            iterations: row.get(2)?,
                            parallelism: row.get(3)?,
                        },
                    ))
                },
            )
            .optional()?;

        let (salt_bytes, params) =
            row.ok_or_else(|| PwVaultError::SaltNotFound(vault.to_string()))?;

        Ok(StoredSalt {
            salt: Salt::from_slice(&salt_bytes)?,
            params,
        })
    }

    fn put_salt(&self, vault: &VaultName, salt: &StoredSalt) -> Result<()> {
        let result = self.conn.execute(
            "INSERT INTO vault_salts (vault_name, salt, memory_kib, iterations, parallelism, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                vault.as_str(),
                &salt.salt.as_bytes()[..],
                salt.params.memory_kib,
                salt.params.iterations,
                salt.params.parallelism,
                Utc::now().to_rfc3339(),
            ],
        );

        match result {
            Ok(_) => {
                debug!(vault = %vault, "salt recorded");
                Ok(())
            }
            Err(e) if constraint_code(&e).is_some() => {
                Err(PwVaultError::SaltAlreadyExists(vault.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn vault_names(&self) -> Result<Vec<VaultName>> {
        let mut stmt = self
            .conn
            .prepare("SELECT vault_name FROM vault_salts ORDER BY vault_name")?;
        let names = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut vaults = Vec::new();
        for name in names {
            vaults.push(VaultName::parse(&name?)?);
        }
        Ok(vaults)
    }
}

// ---------------------------------------------------------------------------
// Record store
// ---------------------------------------------------------------------------

impl RecordStore for SqliteStore {
    fn probe_token(&self, vault: &VaultName) -> Result<Option<String>> {
        let token = self
            .conn
            .query_row(
                "SELECT password FROM credentials WHERE vault_name = ?1 ORDER BY id LIMIT 1",
                params![vault.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(token)
    }

    fn insert_record(&self, vault: &VaultName, record: &NewRecord) -> Result<i64> {
        let result = self.conn.execute(
            "INSERT INTO credentials (vault_name, service, account, password, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                vault.as_str(),
                record.service,
                record.account,
                record.password_token,
                record.created_at.to_rfc3339(),
            ],
        );

        match result {
            Ok(_) => Ok(self.conn.last_insert_rowid()),
            Err(e) => Err(map_record_constraint(e, vault, &record.service)),
        }
    }

    fn find_record(&self, vault: &VaultName, service: &str) -> Result<Option<CredentialRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT id, service, account, password, created_at
                 FROM credentials WHERE vault_name = ?1 AND service = ?2",
                params![vault.as_str(), service],
                record_from_row,
            )
            .optional()?;
        Ok(record)
    }

    fn update_record(&self, vault: &VaultName, record: &CredentialRecord) -> Result<()> {
        let result = self.conn.execute(
            "UPDATE credentials SET service = ?1, account = ?2, password = ?3
             WHERE vault_name = ?4 AND id = ?5",
            params![
                record.service,
                record.account,
                record.password_token,
                vault.as_str(),
                record.id,
            ],
        );

        match result {
            Ok(0) => Err(PwVaultError::RecordNotFound {
                vault: vault.to_string(),
                service: record.service.clone(),
            }),
            Ok(_) => Ok(()),
            Err(e) => Err(map_record_constraint(e, vault, &record.service)),
        }
    }

    fn delete_record(&self, vault: &VaultName, id: i64) -> Result<bool> {
        let removed = self.conn.execute(
            "DELETE FROM credentials WHERE vault_name = ?1 AND id = ?2",
            params![vault.as_str(), id],
        )?;
        Ok(removed > 0)
    }

    fn list_records(&self, vault: &VaultName) -> Result<Vec<CredentialRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, service, account, password, created_at
             FROM credentials WHERE vault_name = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![vault.as_str()], record_from_row)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    fn purge_vault(&self, vault: &VaultName) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let removed = tx.execute(
            "DELETE FROM credentials WHERE vault_name = ?1",
            params![vault.as_str()],
        )?;
        tx.execute(
            "DELETE FROM vault_salts WHERE vault_name = ?1",
            params![vault.as_str()],
        )?;
        tx.commit()?;

        debug!(vault = %vault, removed, "vault purged");
        Ok(removed)
    }

    fn count_records(&self, vault: &VaultName) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM credentials WHERE vault_name = ?1",
            params![vault.as_str()],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<CredentialRecord> {
    let ts: String = row.get(4)?;
    let created_at = DateTime::parse_from_rfc3339(&ts)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;

    Ok(CredentialRecord {
        id: row.get(0)?,
        service: row.get(1)?,
        account: row.get(2)?,
        password_token: row.get(3)?,
        created_at,
    })
}

/// Extended SQLite result code of a constraint violation, if `err` is one.
fn constraint_code(err: &rusqlite::Error) -> Option<i32> {
    match err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation => {
            Some(e.extended_code)
        }
        _ => None,
    }
}

fn map_record_constraint(err: rusqlite::Error, vault: &VaultName, service: &str) -> PwVaultError {
    match constraint_code(&err) {
        Some(rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE) => PwVaultError::DuplicateService {
            vault: vault.to_string(),
            service: service.to_string(),
        },
        Some(rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => {
            PwVaultError::SaltNotFound(vault.to_string())
        }
        _ => err.into(),
    }
}
