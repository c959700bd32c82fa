//! `pwvault audit` — display the audit log.
//!
//! Usage:
//!   pwvault audit                   # show last 50 entries
//!   pwvault audit --last 20         # show last 20
//!   pwvault audit --since 7d        # entries from last 7 days
//!   pwvault audit --vault email     # entries for one vault

use chrono::Utc;

use crate::audit::{AuditEntry, AuditLog};
use crate::cli::output;
use crate::cli::{load_settings, Cli};
use crate::errors::{PwVaultError, Result};

/// Execute the `audit` command.
pub fn execute(cli: &Cli, last: usize, since: Option<&str>, vault: Option<&str>) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let settings = load_settings(cli, &cwd)?;
    let dir = settings.data_path(&cwd);
    if !dir.exists() {
        output::info("No audit entries found.");
        return Ok(());
    }

    let audit = AuditLog::open(&dir, &settings.audit_origin)
        .ok_or_else(|| PwVaultError::AuditError("failed to open audit database".into()))?;

    let since_dt = match since {
        Some(s) => Some(parse_duration(s)?),
        None => None,
    };

    let entries = audit.query(last, since_dt, vault)?;

    if entries.is_empty() {
        output::info("No audit entries found.");
        return Ok(());
    }

    print_audit_table(&entries);

    Ok(())
}

/// Parse a human-friendly duration string like "7d", "24h", "30m".
fn parse_duration(input: &str) -> Result<chrono::DateTime<Utc>> {
    let input = input.trim();

    let (num_str, duration_of): (&str, fn(i64) -> chrono::Duration) =
        if let Some(s) = input.strip_suffix('d') {
            (s, chrono::Duration::days)
        } else if let Some(s) = input.strip_suffix('h') {
            (s, chrono::Duration::hours)
        } else if let Some(s) = input.strip_suffix('m') {
            (s, chrono::Duration::minutes)
        } else {
            return Err(PwVaultError::CommandFailed(format!(
                "invalid duration '{input}' — use format like 7d, 24h, or 30m"
            )));
        };

    let num: i64 = num_str.parse().map_err(|_| {
        PwVaultError::CommandFailed(format!(
            "invalid duration '{input}' — number part is not valid"
        ))
    })?;

    Ok(Utc::now() - duration_of(num))
}

/// Print audit entries in a formatted table.
pub fn print_audit_table(entries: &[AuditEntry]) {
    use comfy_table::{ContentArrangement, Table};
    use console::style;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Actor", "Vault", "Action", "Outcome", "Detail", "Origin"]);

    for entry in entries {
        table.add_row(vec![
            entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            entry.actor.clone(),
            entry.vault.clone().unwrap_or_else(|| "-".into()),
            colorize_action(&entry.action),
            colorize_outcome(&entry.outcome),
            entry.detail.clone().unwrap_or_else(|| "-".into()),
            entry.origin.clone(),
        ]);
    }

    println!(
        "{}",
        style(format!("{} audit entries:", entries.len())).bold()
    );
    println!("{table}");
}

/// Colorize action names for display.
fn colorize_action(action: &str) -> String {
    use console::style;

    match action {
        "create-vault" => style(action).green().to_string(),
        "insert" | "update" => style(action).blue().to_string(),
        "delete" | "delete-vault" => style(action).red().to_string(),
        "access" => style(action).cyan().to_string(),
        _ => action.to_string(),
    }
}

fn colorize_outcome(outcome: &str) -> String {
    use console::style;

    match outcome {
        "failed" => style(outcome).red().bold().to_string(),
        _ => outcome.to_string(),
    }
}
