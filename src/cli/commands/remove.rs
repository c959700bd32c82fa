//! `pwvault remove` — delete a credential from a vault.

use crate::cli::output;
use crate::cli::{confirm, open_manager, unlock, Cli};
use crate::errors::Result;
use crate::vault::VaultName;

/// Execute the `remove` command.
pub fn execute(cli: &Cli, vault: &VaultName, service: &str, force: bool) -> Result<()> {
    // Unless --force is set, ask for confirmation before deleting.
    if !force && !confirm(&format!("Remove '{service}' from vault '{vault}'?"))? {
        output::info("Cancelled.");
        return Ok(());
    }

    let manager = open_manager(cli)?;
    let session = unlock(&manager, cli, vault)?;
    let remaining = manager.delete(&session, service)?;

    output::success(&format!(
        "Removed '{service}' from vault '{vault}' ({} left)",
        remaining.len()
    ));

    Ok(())
}
