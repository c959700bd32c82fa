//! Audit log — append-only record of vault access and edits.
//!
//! Every vault creation, deletion, gate check, and record mutation emits
//! an `AuditEvent` to an `AuditSink`.  The default sink stores events in
//! a local SQLite database at `<data_dir>/audit.db`.
//!
//! Designed for graceful degradation: if the database can't be opened or
//! written to, vault operations continue without logging.  Events carry
//! service names but never passwords or keys.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tracing::warn;

use crate::errors::{PwVaultError, Result};

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    CreateVault,
    DeleteVault,
    Access,
    Insert,
    Update,
    Delete,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateVault => "create-vault",
            Self::DeleteVault => "delete-vault",
            Self::Access => "access",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether it worked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failed,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }
}

/// One immutable audit event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    pub actor: String,
    pub vault: Option<String>,
    pub action: AuditAction,
    pub outcome: Outcome,
    /// Extra context, e.g. the service name or the rejection reason.
    pub detail: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl AuditEvent {
    pub fn new(actor: &str, vault: Option<&str>, action: AuditAction, outcome: Outcome) -> Self {
        Self {
            actor: actor.to_string(),
            vault: vault.map(str::to_string),
            action,
            outcome,
            detail: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Receiver of audit events.  Recording is fire-and-forget.
pub trait AuditSink {
    fn record(&self, event: &AuditEvent);
}

/// An unavailable audit log records nothing.
impl<T: AuditSink> AuditSink for Option<T> {
    fn record(&self, event: &AuditEvent) {
        if let Some(sink) = self {
            sink.record(event);
        }
    }
}

/// A single stored audit log entry.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub actor: String,
    pub vault: Option<String>,
    pub action: String,
    pub outcome: String,
    pub detail: Option<String>,
    pub origin: String,
}

/// SQLite-backed audit log.
pub struct AuditLog {
    conn: Connection,
    origin: String,
}

impl AuditLog {
    /// Open (or create) the audit database at `<data_dir>/audit.db`.
    ///
    /// Returns `None` if the database can't be opened — callers should
    /// treat this as "audit logging unavailable" and continue normally.
    pub fn open(data_dir: &Path, origin: &str) -> Option<Self> {
        let db_path = Self::db_path(data_dir);
        let conn = Connection::open(&db_path).ok()?;

        // Set restrictive permissions on the audit database (owner-only).
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(&db_path, perms);
        }

        Self::init(conn, origin).ok()
    }

    /// Open a throwaway in-memory audit log (used by tests).
    pub fn open_in_memory(origin: &str) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn, origin)
    }

    fn init(conn: Connection, origin: &str) -> Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS audit_log (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp   TEXT NOT NULL,
                actor       TEXT NOT NULL,
                vault_name  TEXT,
                action      TEXT NOT NULL,
                outcome     TEXT NOT NULL,
                detail      TEXT,
                origin      TEXT NOT NULL
            );",
        )
        .map_err(|e| PwVaultError::AuditError(format!("schema: {e}")))?;

        Ok(Self {
            conn,
            origin: origin.to_string(),
        })
    }

    /// Query recent audit entries.
    ///
    /// - `limit`: maximum number of entries to return (most recent first).
    /// - `since`: if provided, only return entries newer than this timestamp.
    /// - `vault`: if provided, only return entries for this vault.
    pub fn query(
        &self,
        limit: usize,
        since: Option<DateTime<Utc>>,
        vault: Option<&str>,
    ) -> Result<Vec<AuditEntry>> {
        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        let since_str = since.map(|ts| ts.to_rfc3339());

        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, timestamp, actor, vault_name, action, outcome, detail, origin
                 FROM audit_log
                 WHERE (?1 IS NULL OR timestamp >= ?1)
                   AND (?2 IS NULL OR vault_name = ?2)
                 ORDER BY id DESC
                 LIMIT ?3",
            )
            .map_err(|e| PwVaultError::AuditError(format!("query prepare: {e}")))?;

        let rows = stmt
            .query_map(rusqlite::params![since_str, vault, limit_i64], |row| {
                let ts_str: String = row.get(1)?;
                let timestamp = DateTime::parse_from_rfc3339(&ts_str)
                    .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

                Ok(AuditEntry {
                    id: row.get(0)?,
                    timestamp,
                    actor: row.get(2)?,
                    vault: row.get(3)?,
                    action: row.get(4)?,
                    outcome: row.get(5)?,
                    detail: row.get(6)?,
                    origin: row.get(7)?,
                })
            })
            .map_err(|e| PwVaultError::AuditError(format!("query exec: {e}")))?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.map_err(|e| PwVaultError::AuditError(format!("row parse: {e}")))?);
        }

        Ok(entries)
    }

    /// Return the path to the audit database (for testing/display).
    pub fn db_path(data_dir: &Path) -> PathBuf {
        data_dir.join("audit.db")
    }
}

impl AuditSink for AuditLog {
    fn record(&self, event: &AuditEvent) {
        let result = self.conn.execute(
            "INSERT INTO audit_log (timestamp, actor, vault_name, action, outcome, detail, origin)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                event.timestamp.to_rfc3339(),
                event.actor,
                event.vault,
                event.action.as_str(),
                event.outcome.as_str(),
                event.detail,
                self.origin,
            ],
        );
        if let Err(e) = result {
            warn!(error = %e, action = event.action.as_str(), "audit write failed");
        }
    }
}
