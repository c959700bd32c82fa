//! `pwvault drop` — delete a vault and all of its credentials.

use crate::cli::output;
use crate::cli::{confirm, open_manager, prompt_password, Cli};
use crate::errors::Result;
use crate::vault::VaultName;

/// Execute the `drop` command.
pub fn execute(cli: &Cli, vault: &VaultName, force: bool) -> Result<()> {
    if !force && !confirm(&format!("Delete vault '{vault}'? This cannot be undone"))? {
        output::info("Cancelled.");
        return Ok(());
    }

    let manager = open_manager(cli)?;
    let password = prompt_password(vault)?;
    let removed = manager.delete_vault(&cli.actor, vault, password.as_bytes())?;

    output::success(&format!(
        "Deleted vault '{vault}' ({removed} credential(s) removed)"
    ));

    Ok(())
}
