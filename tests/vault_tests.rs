//! Integration tests for the SQLite store and record operations.

use chrono::Utc;
use pwvault::audit::AuditLog;
use pwvault::crypto::{derive_key, encrypt, Argon2Params, Salt};
use pwvault::errors::PwVaultError;
use pwvault::vault::record::NewRecord;
use pwvault::vault::{
    GateResult, NewCredential, RecordStore, RecordUpdate, RejectReason, SaltStore, SqliteStore,
    StoredSalt, VaultManager, VaultName,
};

fn fast() -> Argon2Params {
    Argon2Params {
        memory_kib: 8_192,
        iterations: 1,
        parallelism: 1,
    }
}

fn name(s: &str) -> VaultName {
    VaultName::parse(s).unwrap()
}

fn manager() -> VaultManager<SqliteStore, Option<AuditLog>> {
    VaultManager::new(SqliteStore::open_in_memory().unwrap(), None, fast())
}

fn cred<'a>(service: &'a str, account: &'a str, password: &'a str) -> NewCredential<'a> {
    NewCredential {
        service,
        account,
        password,
    }
}

#[test]
fn put_salt_twice_is_rejected_and_keeps_original() {
    let store = SqliteStore::open_in_memory().unwrap();
    let vault = name("email");
    let first = StoredSalt {
        salt: Salt::from_bytes([1; 16]),
        params: fast(),
    };
    let second = StoredSalt {
        salt: Salt::from_bytes([2; 16]),
        params: fast(),
    };

    store.put_salt(&vault, &first).unwrap();
    let err = store.put_salt(&vault, &second).unwrap_err();
    assert!(matches!(err, PwVaultError::SaltAlreadyExists(_)));

    assert_eq!(store.get_salt(&vault).unwrap().salt.as_bytes(), &[1; 16]);
}

#[test]
fn create_vault_twice_fails() {
    let m = manager();
    let vault = name("email");
    m.create_vault("alice", &vault, b"pw").unwrap();
    let err = m.create_vault("alice", &vault, b"pw").unwrap_err();
    assert!(matches!(err, PwVaultError::VaultAlreadyExists(_)));
}

#[test]
fn create_vault_rejects_empty_password() {
    let m = manager();
    let err = m.create_vault("alice", &name("email"), b"").unwrap_err();
    assert!(matches!(err, PwVaultError::EmptyPassword));
    assert!(m.list_vaults().unwrap().is_empty());
}

#[test]
fn insert_then_list_decrypts() {
    let m = manager();
    let vault = name("email");
    let session = m.create_vault("alice", &vault, b"pw").unwrap();

    let meta = m.insert(&session, &cred("gmail", "me@example.com", "abc123")).unwrap();
    assert_eq!(meta.len(), 1);
    assert_eq!(meta[0].service, "gmail");

    let records = m.list_decrypted(&session).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].password.as_plaintext(), Some("abc123"));
}

#[test]
fn stored_token_is_not_plaintext() {
    let m = manager();
    let vault = name("email");
    let session = m.create_vault("alice", &vault, b"pw").unwrap();
    m.insert(&session, &cred("gmail", "me", "abc123")).unwrap();

    let record = m.store().find_record(&vault, "gmail").unwrap().unwrap();
    assert!(record.password_token.starts_with("A256GCM."));
    assert!(!record.password_token.contains("abc123"));
}

#[test]
fn duplicate_service_is_rejected() {
    let m = manager();
    let vault = name("email");
    let session = m.create_vault("alice", &vault, b"pw").unwrap();
    m.insert(&session, &cred("gmail", "a", "x")).unwrap();

    let err = m.insert(&session, &cred("gmail", "b", "y")).unwrap_err();
    assert!(matches!(err, PwVaultError::DuplicateService { .. }));
    assert_eq!(m.store().count_records(&vault).unwrap(), 1);
}

#[test]
fn empty_service_or_account_is_rejected() {
    let m = manager();
    let session = m.create_vault("alice", &name("email"), b"pw").unwrap();
    assert!(matches!(
        m.insert(&session, &cred("  ", "a", "x")),
        Err(PwVaultError::InvalidRecord(_))
    ));
    assert!(matches!(
        m.insert(&session, &cred("gmail", "", "x")),
        Err(PwVaultError::InvalidRecord(_))
    ));
}

#[test]
fn update_account_only_keeps_ciphertext_byte_for_byte() {
    let m = manager();
    let vault = name("email");
    let session = m.create_vault("alice", &vault, b"pw").unwrap();
    m.insert(&session, &cred("gmail", "old@example.com", "abc123")).unwrap();
    let before = m.store().find_record(&vault, "gmail").unwrap().unwrap();

    m.update(
        &session,
        "gmail",
        &RecordUpdate {
            account: Some("new@example.com"),
            ..RecordUpdate::default()
        },
    )
    .unwrap();

    let after = m.store().find_record(&vault, "gmail").unwrap().unwrap();
    assert_eq!(after.account, "new@example.com");
    assert_eq!(after.password_token, before.password_token);
    assert_eq!(after.id, before.id);
}

#[test]
fn update_password_and_rename() {
    let m = manager();
    let vault = name("email");
    let session = m.create_vault("alice", &vault, b"pw").unwrap();
    m.insert(&session, &cred("gmail", "me", "abc123")).unwrap();

    m.update(
        &session,
        "gmail",
        &RecordUpdate {
            service: Some("googlemail"),
            password: Some("n3w-pass"),
            ..RecordUpdate::default()
        },
    )
    .unwrap();

    assert!(m.store().find_record(&vault, "gmail").unwrap().is_none());
    let records = m.list_decrypted(&session).unwrap();
    assert_eq!(records[0].service, "googlemail");
    assert_eq!(records[0].password.as_plaintext(), Some("n3w-pass"));
}

#[test]
fn rename_onto_existing_service_is_rejected() {
    let m = manager();
    let vault = name("email");
    let session = m.create_vault("alice", &vault, b"pw").unwrap();
    m.insert(&session, &cred("gmail", "a", "x")).unwrap();
    m.insert(&session, &cred("outlook", "b", "y")).unwrap();

    let err = m
        .update(
            &session,
            "outlook",
            &RecordUpdate {
                service: Some("gmail"),
                ..RecordUpdate::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, PwVaultError::DuplicateService { .. }));
}

#[test]
fn update_missing_record_is_not_found() {
    let m = manager();
    let session = m.create_vault("alice", &name("email"), b"pw").unwrap();
    let err = m
        .update(
            &session,
            "nope",
            &RecordUpdate {
                account: Some("x"),
                ..RecordUpdate::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, PwVaultError::RecordNotFound { .. }));
}

#[test]
fn delete_missing_record_leaves_count_unchanged() {
    let m = manager();
    let vault = name("email");
    let session = m.create_vault("alice", &vault, b"pw").unwrap();
    m.insert(&session, &cred("gmail", "me", "abc123")).unwrap();

    let err = m.delete(&session, "nope").unwrap_err();
    assert!(matches!(err, PwVaultError::RecordNotFound { .. }));
    assert_eq!(m.store().count_records(&vault).unwrap(), 1);

    let remaining = m.delete(&session, "gmail").unwrap();
    assert!(remaining.is_empty());
}

#[test]
fn listing_survives_a_record_from_another_key() {
    let m = manager();
    let vault = name("email");
    let session = m.create_vault("alice", &vault, b"pw").unwrap();
    m.insert(&session, &cred("gmail", "me", "abc123")).unwrap();

    // A row written under an unrelated key.
    let stray = derive_key(b"other", &Salt::generate(), &fast()).unwrap();
    m.store()
        .insert_record(
            &vault,
            &NewRecord {
                service: "bank".into(),
                account: "me".into(),
                password_token: encrypt(&stray, b"hunter2").unwrap(),
                created_at: Utc::now(),
            },
        )
        .unwrap();

    let records = m.list_decrypted(&session).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].password.as_plaintext(), Some("abc123"));
    assert!(records[1].password.is_undecryptable());
}

#[test]
fn vaults_are_partitioned() {
    let m = manager();
    let a = m.create_vault("alice", &name("email"), b"pw-a").unwrap();
    let b = m.create_vault("alice", &name("bank"), b"pw-b").unwrap();
    m.insert(&a, &cred("gmail", "me", "x")).unwrap();
    m.insert(&b, &cred("gmail", "me", "y")).unwrap();

    assert_eq!(m.list_decrypted(&a).unwrap()[0].password.as_plaintext(), Some("x"));
    assert_eq!(m.list_decrypted(&b).unwrap()[0].password.as_plaintext(), Some("y"));
}

#[test]
fn delete_vault_removes_records_and_salt() {
    let m = manager();
    let vault = name("email");
    let session = m.create_vault("alice", &vault, b"pw").unwrap();
    m.insert(&session, &cred("gmail", "me", "x")).unwrap();
    m.insert(&session, &cred("outlook", "me", "y")).unwrap();

    assert_eq!(m.delete_vault("alice", &vault, b"pw").unwrap(), 2);
    assert!(m.list_vaults().unwrap().is_empty());
    assert!(matches!(
        m.store().get_salt(&vault),
        Err(PwVaultError::SaltNotFound(_))
    ));
}

#[test]
fn delete_vault_with_wrong_password_is_denied() {
    let m = manager();
    let vault = name("email");
    let session = m.create_vault("alice", &vault, b"pw").unwrap();
    m.insert(&session, &cred("gmail", "me", "x")).unwrap();

    let err = m.delete_vault("alice", &vault, b"nope").unwrap_err();
    assert!(matches!(err, PwVaultError::AccessDenied(_)));
    assert_eq!(m.store().count_records(&vault).unwrap(), 1);
}

#[test]
fn failed_vault_delete_keeps_the_vault_guarded() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("vaults.db");
    let vault = name("email");
    let m = VaultManager::new(SqliteStore::open(&path).unwrap(), None::<AuditLog>, fast());
    let session = m.create_vault("alice", &vault, b"pw").unwrap();
    m.insert(&session, &cred("gmail", "me", "x")).unwrap();
    m.insert(&session, &cred("outlook", "me", "y")).unwrap();

    // Make the salt delete fail after the record delete has run.
    rusqlite::Connection::open(&path)
        .unwrap()
        .execute_batch(
            "CREATE TRIGGER keep_salts BEFORE DELETE ON vault_salts
             BEGIN SELECT RAISE(ABORT, 'salt delete refused'); END;",
        )
        .unwrap();

    assert!(m.delete_vault("alice", &vault, b"pw").is_err());
    assert_eq!(m.store().count_records(&vault).unwrap(), 2);
    assert_eq!(m.list_vaults().unwrap(), vec![vault.clone()]);

    let gate = m.check_gate("alice", &vault, b"wrong").unwrap();
    assert!(matches!(gate, GateResult::Rejected(RejectReason::WrongPassword)));
}

#[test]
fn padded_service_name_matches_stored_record() {
    let m = manager();
    let vault = name("email");
    let session = m.create_vault("alice", &vault, b"pw").unwrap();
    m.insert(&session, &cred(" gmail ", "me", "abc123")).unwrap();

    let meta = m
        .update(
            &session,
            " gmail ",
            &RecordUpdate {
                account: Some("me@example.com"),
                ..RecordUpdate::default()
            },
        )
        .unwrap();
    assert_eq!(meta[0].service, "gmail");
    assert_eq!(meta[0].account, "me@example.com");

    let remaining = m.delete(&session, " gmail ").unwrap();
    assert!(remaining.is_empty());
}

#[test]
fn blank_target_service_is_not_found() {
    let m = manager();
    let session = m.create_vault("alice", &name("email"), b"pw").unwrap();
    m.insert(&session, &cred("gmail", "me", "abc123")).unwrap();

    let err = m.delete(&session, "   ").unwrap_err();
    assert!(matches!(err, PwVaultError::RecordNotFound { .. }));
}

#[test]
fn update_without_changes_is_rejected_and_writes_nothing() {
    let m = manager();
    let vault = name("email");
    let session = m.create_vault("alice", &vault, b"pw").unwrap();
    m.insert(&session, &cred("gmail", "me", "abc123")).unwrap();
    let before = m.store().find_record(&vault, "gmail").unwrap().unwrap();

    let err = m
        .update(&session, "gmail", &RecordUpdate::default())
        .unwrap_err();
    assert!(matches!(err, PwVaultError::InvalidRecord(_)));

    let after = m.store().find_record(&vault, "gmail").unwrap().unwrap();
    assert_eq!(after.password_token, before.password_token);
    assert_eq!(after.account, before.account);
}

#[test]
fn file_store_persists_across_reopen() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("data").join("vaults.db");
    let vault = name("email");

    {
        let m = VaultManager::new(SqliteStore::open(&path).unwrap(), None::<AuditLog>, fast());
        let session = m.create_vault("alice", &vault, b"pw").unwrap();
        m.insert(&session, &cred("gmail", "me", "abc123")).unwrap();
    }

    let m = VaultManager::new(SqliteStore::open(&path).unwrap(), None::<AuditLog>, fast());
    let session = m.open_session("alice", &vault, b"pw").unwrap();
    let records = m.list_decrypted(&session).unwrap();
    assert_eq!(records[0].password.as_plaintext(), Some("abc123"));
}
