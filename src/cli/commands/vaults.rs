//! `pwvault vaults` — list every vault in the store.

use crate::cli::output;
use crate::cli::{open_manager, Cli};
use crate::errors::Result;

/// Execute the `vaults` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let manager = open_manager(cli)?;
    let vaults = manager.list_vaults()?;
    output::print_vaults_table(&vaults);
    Ok(())
}
