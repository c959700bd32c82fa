//! `pwvault create` — create a new, empty vault.

use crate::cli::output;
use crate::cli::{open_manager, prompt_new_password, Cli};
use crate::errors::Result;
use crate::vault::VaultName;

/// Execute the `create` command.
pub fn execute(cli: &Cli, vault: &VaultName) -> Result<()> {
    let manager = open_manager(cli)?;
    let password = prompt_new_password()?;

    manager.create_vault(&cli.actor, vault, password.as_bytes())?;

    output::success(&format!("Created vault '{vault}'"));
    output::tip(&format!(
        "Add a credential: pwvault add {vault} <SERVICE> <ACCOUNT>"
    ));

    Ok(())
}
