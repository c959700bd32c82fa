//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::io::{self, IsTerminal, Read};
use std::path::Path;

use clap::Parser;
use clap_complete::Shell;
use tracing::warn;
use zeroize::Zeroizing;

use crate::audit::AuditLog;
use crate::config::Settings;
use crate::errors::{PwVaultError, Result};
use crate::vault::{GateResult, RejectReason, Session, SqliteStore, VaultManager, VaultName};

/// Minimum master password length accepted at the CLI.
const MIN_PASSWORD_LEN: usize = 8;

/// Environment variable holding the master password for scripted use.
pub const PASSWORD_ENV: &str = "PWVAULT_PASSWORD";

/// The manager type every command works with.
pub type Manager = VaultManager<SqliteStore, Option<AuditLog>>;

/// pwvault: local encrypted password vault.
#[derive(Parser)]
#[command(
    name = "pwvault",
    about = "Local encrypted password vault",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory (overrides `data_dir` from .pwvault.toml)
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Identity recorded in the audit log
    #[arg(long, global = true, env = "PWVAULT_ACTOR", default_value = "local")]
    pub actor: String,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new vault protected by a master password
    Create {
        /// Vault name (lowercase letters, digits, '_' and '-')
        vault: VaultName,
    },

    /// Delete a vault and every credential in it
    Drop {
        vault: VaultName,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// List all vaults
    Vaults,

    /// List the credentials stored in a vault
    List {
        vault: VaultName,
        /// Hide passwords
        #[arg(long)]
        redact: bool,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Add a credential (password is read from stdin or prompted)
    Add {
        vault: VaultName,
        /// Service name (e.g. github)
        service: String,
        /// Account or username for the service
        account: String,
        /// Generate a random password instead of reading one
        #[arg(short, long)]
        generate: bool,
        /// Length of the generated password
        #[arg(long, requires = "generate")]
        length: Option<usize>,
    },

    /// Change the service name, account or password of a credential
    Update {
        vault: VaultName,
        /// Service of the credential to change
        service: String,
        /// New service name
        #[arg(long = "service", value_name = "NEW")]
        new_service: Option<String>,
        /// New account
        #[arg(long = "account", value_name = "NEW")]
        new_account: Option<String>,
        /// Read a new password from stdin or a prompt
        #[arg(long)]
        password: bool,
    },

    /// Remove a credential
    Remove {
        vault: VaultName,
        service: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Generate a random password
    Generate {
        /// Password length (default from .pwvault.toml, at least 16)
        #[arg(short, long)]
        length: Option<usize>,
        /// Exclude punctuation
        #[arg(long)]
        no_special: bool,
        /// Exclude digits
        #[arg(long)]
        no_digits: bool,
        /// Exclude letters
        #[arg(long)]
        no_letters: bool,
        /// Copy the password to the clipboard
        #[arg(long)]
        copy: bool,
    },

    /// Estimate the strength of a password
    Check {
        /// Password to check (omit for an interactive prompt)
        password: Option<String>,
    },

    /// View the audit log of vault operations
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
        /// Only show entries for this vault
        #[arg(long)]
        vault: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load `.pwvault.toml` from the working directory and apply CLI overrides.
pub fn load_settings(cli: &Cli, project_dir: &Path) -> Result<Settings> {
    let mut settings = Settings::load(project_dir)?;
    if let Some(dir) = &cli.data_dir {
        settings.data_dir = dir.clone();
    }
    Ok(settings)
}

/// Open the vault store and the audit log described by the settings.
///
/// An audit log that cannot be opened is logged and skipped.
pub fn open_manager(cli: &Cli) -> Result<Manager> {
    let cwd = std::env::current_dir()?;
    let settings = load_settings(cli, &cwd)?;

    let store = SqliteStore::open(&settings.store_path(&cwd))?;
    let audit = AuditLog::open(&settings.data_path(&cwd), &settings.audit_origin);
    if audit.is_none() {
        warn!(dir = %settings.data_path(&cwd).display(), "audit log unavailable");
    }

    Ok(VaultManager::new(store, audit, settings.argon2_params()))
}

/// Get a vault's master password, trying in order:
/// 1. `PWVAULT_PASSWORD` env var (scripts)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password(vault: &VaultName) -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    let pw = dialoguer::Password::new()
        .with_prompt(format!("Master password for '{vault}'"))
        .interact()
        .map_err(|e| PwVaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for the master password and run the gate.
///
/// An empty vault cannot confirm the password, so the caller is warned
/// that the session is unverified.
pub fn unlock(manager: &Manager, cli: &Cli, vault: &VaultName) -> Result<Session> {
    let password = prompt_password(vault)?;
    match manager.check_gate(&cli.actor, vault, password.as_bytes())? {
        GateResult::Rejected(RejectReason::SaltNotFound) => {
            Err(PwVaultError::SaltNotFound(vault.to_string()))
        }
        GateResult::EmptyVaultPassthrough(session) => {
            output::warning(&format!(
                "Vault '{vault}' is empty; the password could not be verified."
            ));
            Ok(session)
        }
        result => result.into_session(vault),
    }
}

/// Prompt for a new master password with confirmation (used by `create`).
///
/// Also respects `PWVAULT_PASSWORD` for scripted usage.
/// Enforces a minimum password length.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            if pw.chars().count() < MIN_PASSWORD_LEN {
                return Err(PwVaultError::CommandFailed(format!(
                    "password must be at least {MIN_PASSWORD_LEN} characters"
                )));
            }
            return Ok(Zeroizing::new(pw));
        }
    }

    loop {
        let password = dialoguer::Password::new()
            .with_prompt("Choose master password")
            .with_confirmation(
                "Confirm master password",
                "Passwords do not match, try again",
            )
            .interact()
            .map_err(|e| PwVaultError::CommandFailed(format!("password prompt: {e}")))?;

        if password.chars().count() < MIN_PASSWORD_LEN {
            output::warning(&format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(Zeroizing::new(password));
    }
}

/// Read a credential password from piped stdin, or prompt for it.
pub fn read_secret_value(prompt: &str) -> Result<Zeroizing<String>> {
    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        let trimmed = buf.trim_end_matches(['\r', '\n']);
        return Ok(Zeroizing::new(trimmed.to_string()));
    }

    let value = dialoguer::Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| PwVaultError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(Zeroizing::new(value))
}

/// Ask a yes/no question, defaulting to "no".
pub fn confirm(prompt: &str) -> Result<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| PwVaultError::CommandFailed(format!("confirm prompt: {e}")))
}
