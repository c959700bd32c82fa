//! `pwvault update` — change an existing credential.

use crate::cli::output;
use crate::cli::{open_manager, read_secret_value, unlock, Cli};
use crate::errors::{PwVaultError, Result};
use crate::vault::{RecordUpdate, VaultName};

/// Execute the `update` command.
pub fn execute(
    cli: &Cli,
    vault: &VaultName,
    service: &str,
    new_service: Option<&str>,
    new_account: Option<&str>,
    new_password: bool,
) -> Result<()> {
    if new_service.is_none() && new_account.is_none() && !new_password {
        return Err(PwVaultError::CommandFailed(
            "nothing to update — pass --service, --account or --password".into(),
        ));
    }

    let manager = open_manager(cli)?;
    let session = unlock(&manager, cli, vault)?;

    let password = if new_password {
        let value = read_secret_value(&format!("New password for {service}"))?;
        if value.is_empty() {
            return Err(PwVaultError::InvalidRecord("password cannot be empty".into()));
        }
        Some(value)
    } else {
        None
    };

    let changes = RecordUpdate {
        service: new_service,
        account: new_account,
        password: password.as_ref().map(|p| p.as_str()),
    };
    manager.update(&session, service, &changes)?;

    let shown = new_service.map_or(service, str::trim);
    output::success(&format!("Updated '{shown}' in vault '{vault}'"));

    Ok(())
}
