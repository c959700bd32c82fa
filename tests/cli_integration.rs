//! Integration tests for the pwvault CLI.
//!
//! These tests exercise the binary end-to-end using `assert_cmd`.
//! Master passwords come from `PWVAULT_PASSWORD` and credential
//! passwords from piped stdin, so nothing prompts.  Each test writes a
//! `.pwvault.toml` with a cheap Argon2 cost into its own temp directory.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

const MASTER: &str = "Tr0ub4dor&3";

const FAST_CONFIG: &str = "\
argon2_memory_kib = 8192
argon2_iterations = 1
argon2_parallelism = 1
";

/// Helper: get a Command pointing at the pwvault binary.
fn pwvault() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("pwvault").expect("binary should exist")
}

/// A project directory with a fast config.
fn project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    tmp.child(".pwvault.toml").write_str(FAST_CONFIG).unwrap();
    tmp
}

/// A command rooted in `dir` with the master password set.
fn in_project(dir: &TempDir, password: &str) -> Command {
    let mut cmd = pwvault();
    cmd.current_dir(dir.path())
        .env("PWVAULT_PASSWORD", password)
        .env_remove("PWVAULT_ACTOR")
        .env_remove("PWVAULT_LOG");
    cmd
}

fn create(dir: &TempDir, vault: &str) {
    in_project(dir, MASTER)
        .args(["create", vault])
        .assert()
        .success();
}

fn add(dir: &TempDir, vault: &str, service: &str, account: &str, password: &str) {
    in_project(dir, MASTER)
        .args(["add", vault, service, account])
        .write_stdin(format!("{password}\n"))
        .assert()
        .success();
}

#[test]
fn help_flag_shows_usage() {
    pwvault()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Local encrypted password vault"))
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn version_flag_shows_version() {
    pwvault()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pwvault"));
}

#[test]
fn no_args_shows_help() {
    pwvault()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn create_then_vaults_lists_it() {
    let dir = project();
    create(&dir, "email");

    dir.child(".pwvault/vaults.db").assert(predicate::path::exists());

    in_project(&dir, MASTER)
        .arg("vaults")
        .assert()
        .success()
        .stdout(predicate::str::contains("email"));
}

#[test]
fn create_rejects_invalid_name() {
    let dir = project();
    in_project(&dir, MASTER)
        .args(["create", "Not Valid"])
        .assert()
        .failure();
}

#[test]
fn create_rejects_short_master_password() {
    let dir = project();
    in_project(&dir, "short")
        .args(["create", "email"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 8"));
}

#[test]
fn create_twice_fails() {
    let dir = project();
    create(&dir, "email");
    in_project(&dir, MASTER)
        .args(["create", "email"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn add_then_list_shows_decrypted_password() {
    let dir = project();
    create(&dir, "email");
    add(&dir, "email", "gmail", "me@example.com", "abc123");

    in_project(&dir, MASTER)
        .args(["list", "email"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gmail"))
        .stdout(predicate::str::contains("me@example.com"))
        .stdout(predicate::str::contains("abc123"));
}

#[test]
fn list_redact_hides_passwords() {
    let dir = project();
    create(&dir, "email");
    add(&dir, "email", "gmail", "me", "abc123");

    in_project(&dir, MASTER)
        .args(["list", "email", "--redact"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gmail"))
        .stdout(predicate::str::contains("abc123").not());
}

#[test]
fn list_json_is_parseable() {
    let dir = project();
    create(&dir, "email");
    add(&dir, "email", "gmail", "me", "abc123");

    let out = in_project(&dir, MASTER)
        .args(["list", "email", "--json"])
        .output()
        .unwrap();
    assert!(out.status.success());

    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value[0]["service"], "gmail");
    assert_eq!(value[0]["password"], "abc123");
}

#[test]
fn wrong_password_is_denied() {
    let dir = project();
    create(&dir, "email");
    add(&dir, "email", "gmail", "me", "abc123");

    in_project(&dir, "not-the-password")
        .args(["list", "email"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("denied"))
        .stdout(predicate::str::contains("abc123").not());
}

#[test]
fn unknown_vault_is_not_found() {
    let dir = project();
    in_project(&dir, MASTER)
        .args(["list", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));

    // The failed lookup did not create the vault.
    in_project(&dir, MASTER)
        .arg("vaults")
        .assert()
        .success()
        .stdout(predicate::str::contains("ghost").not());
}

#[test]
fn duplicate_service_is_rejected() {
    let dir = project();
    create(&dir, "email");
    add(&dir, "email", "gmail", "me", "abc123");

    in_project(&dir, MASTER)
        .args(["add", "email", "gmail", "other"])
        .write_stdin("zzz\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn add_with_generate_stores_a_long_password() {
    let dir = project();
    create(&dir, "email");

    in_project(&dir, MASTER)
        .args(["add", "email", "gmail", "me", "--generate", "--length", "24"])
        .assert()
        .success();

    let out = in_project(&dir, MASTER)
        .args(["list", "email", "--json"])
        .output()
        .unwrap();
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value[0]["password"].as_str().unwrap().len(), 24);
}

#[test]
fn update_account_and_password() {
    let dir = project();
    create(&dir, "email");
    add(&dir, "email", "gmail", "old@example.com", "abc123");

    in_project(&dir, MASTER)
        .args(["update", "email", "gmail", "--account", "new@example.com", "--password"])
        .write_stdin("n3w-secret\n")
        .assert()
        .success();

    in_project(&dir, MASTER)
        .args(["list", "email"])
        .assert()
        .success()
        .stdout(predicate::str::contains("new@example.com"))
        .stdout(predicate::str::contains("n3w-secret"))
        .stdout(predicate::str::contains("abc123").not());
}

#[test]
fn update_without_changes_fails() {
    let dir = project();
    create(&dir, "email");
    in_project(&dir, MASTER)
        .args(["update", "email", "gmail"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to update"));
}

#[test]
fn remove_deletes_credential() {
    let dir = project();
    create(&dir, "email");
    add(&dir, "email", "gmail", "me", "abc123");
    add(&dir, "email", "outlook", "me", "xyz789");

    in_project(&dir, MASTER)
        .args(["remove", "email", "gmail", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 left"));

    in_project(&dir, MASTER)
        .args(["remove", "email", "gmail", "--force"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No entry"));
}

#[test]
fn drop_removes_vault() {
    let dir = project();
    create(&dir, "email");
    add(&dir, "email", "gmail", "me", "abc123");

    in_project(&dir, MASTER)
        .args(["drop", "email", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 credential(s) removed"));

    in_project(&dir, MASTER)
        .arg("vaults")
        .assert()
        .success()
        .stdout(predicate::str::contains("No vaults"));
}

#[test]
fn generate_prints_password_of_requested_length() {
    let dir = project();
    let out = in_project(&dir, MASTER)
        .args(["generate", "--length", "20"])
        .output()
        .unwrap();
    assert!(out.status.success());

    let stdout = String::from_utf8(out.stdout).unwrap();
    let first = stdout.lines().next().unwrap();
    assert_eq!(first.chars().count(), 20);
    assert!(stdout.contains("Entropy"));
}

#[test]
fn generate_rejects_short_length() {
    let dir = project();
    in_project(&dir, MASTER)
        .args(["generate", "--length", "8"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 16"));
}

#[test]
fn check_uses_configured_dictionary() {
    let dir = project();
    dir.child("words.txt").write_str("password\n").unwrap();
    dir.child(".pwvault.toml")
        .write_str(&format!("{FAST_CONFIG}dictionary_path = \"words.txt\"\n"))
        .unwrap();

    in_project(&dir, MASTER)
        .args(["check", "password"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Very Weak"))
        .stderr(predicate::str::contains("dictionary word"));
}

#[test]
fn check_reads_piped_password() {
    let dir = project();
    in_project(&dir, MASTER)
        .arg("check")
        .write_stdin("q8$Vn2!pLw#7zR@e4Kx&9mTb^\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Strong"));
}

#[test]
fn audit_records_vault_activity() {
    let dir = project();
    create(&dir, "email");
    add(&dir, "email", "gmail", "me", "abc123");
    in_project(&dir, "wrong-password")
        .args(["list", "email"])
        .assert()
        .failure();

    in_project(&dir, MASTER)
        .args(["--actor", "alice", "audit", "--vault", "email"])
        .assert()
        .success()
        .stdout(predicate::str::contains("create-vault"))
        .stdout(predicate::str::contains("insert"))
        .stdout(predicate::str::contains("failed"));
}

#[test]
fn audit_without_data_dir_is_empty() {
    let dir = project();
    in_project(&dir, MASTER)
        .arg("audit")
        .assert()
        .success()
        .stdout(predicate::str::contains("No audit entries"));
}

#[test]
fn data_dir_flag_relocates_store() {
    let dir = project();
    in_project(&dir, MASTER)
        .args(["--data-dir", "elsewhere", "create", "email"])
        .assert()
        .success();

    dir.child("elsewhere/vaults.db").assert(predicate::path::exists());
    dir.child(".pwvault").assert(predicate::path::missing());
}

#[test]
fn completions_bash_succeeds() {
    pwvault()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pwvault"));
}

#[test]
fn completions_unknown_shell_is_a_usage_error() {
    pwvault()
        .args(["completions", "csh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("csh"));
}
