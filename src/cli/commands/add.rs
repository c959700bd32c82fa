//! `pwvault add` — store a new credential in a vault.

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{load_settings, open_manager, read_secret_value, unlock, Cli};
use crate::errors::{PwVaultError, Result};
use crate::password::{generate, GeneratorOptions};
use crate::vault::{NewCredential, VaultName};

/// Execute the `add` command.
pub fn execute(
    cli: &Cli,
    vault: &VaultName,
    service: &str,
    account: &str,
    generate_password: bool,
    length: Option<usize>,
) -> Result<()> {
    let manager = open_manager(cli)?;
    let session = unlock(&manager, cli, vault)?;

    // Read or generate the account password only after the gate passed.
    let password: Zeroizing<String> = if generate_password {
        let cwd = std::env::current_dir()?;
        let length = match length {
            Some(n) => n,
            None => load_settings(cli, &cwd)?.default_password_length,
        };
        generate(&GeneratorOptions::with_length(length))?
    } else {
        read_secret_value(&format!("Password for {service}"))?
    };

    if password.is_empty() {
        return Err(PwVaultError::InvalidRecord("password cannot be empty".into()));
    }

    let records = manager.insert(
        &session,
        &NewCredential {
            service,
            account,
            password: &password,
        },
    )?;

    output::success(&format!(
        "Added '{}' to vault '{vault}' ({} total)",
        service.trim(),
        records.len()
    ));
    if generate_password {
        output::tip(&format!("Reveal it with: pwvault list {vault}"));
    }

    Ok(())
}
