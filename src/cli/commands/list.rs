//! `pwvault list` — show the credentials stored in a vault.

use serde::Serialize;

use crate::cli::output;
use crate::cli::{open_manager, unlock, Cli};
use crate::errors::{PwVaultError, Result};
use crate::vault::{DecryptedRecord, VaultName};

/// JSON shape used with `--redact`.
#[derive(Serialize)]
struct RedactedRecord<'a> {
    service: &'a str,
    account: &'a str,
    decryptable: bool,
    created_at: String,
}

/// Execute the `list` command.
pub fn execute(cli: &Cli, vault: &VaultName, redact: bool, json: bool) -> Result<()> {
    let manager = open_manager(cli)?;
    let session = unlock(&manager, cli, vault)?;
    let records = manager.list_decrypted(&session)?;

    if json {
        println!("{}", to_json(&records, redact)?);
        return Ok(());
    }

    output::print_records_table(vault, &records, redact);

    let undecryptable = records
        .iter()
        .filter(|r| r.password.is_undecryptable())
        .count();
    if undecryptable > 0 {
        output::warning(&format!(
            "{undecryptable} credential(s) could not be decrypted with this password"
        ));
    }

    Ok(())
}

fn to_json(records: &[DecryptedRecord], redact: bool) -> Result<String> {
    let rendered = if redact {
        let redacted: Vec<RedactedRecord<'_>> = records
            .iter()
            .map(|r| RedactedRecord {
                service: &r.service,
                account: &r.account,
                decryptable: !r.password.is_undecryptable(),
                created_at: r.created_at.to_rfc3339(),
            })
            .collect();
        serde_json::to_string_pretty(&redacted)
    } else {
        serde_json::to_string_pretty(records)
    };
    rendered.map_err(|e| PwVaultError::SerializationError(e.to_string()))
}
