//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::password::strength::{MatchKind, StrengthReport};
use crate::password::Strength;
use crate::vault::{DecryptedRecord, VaultName};

/// Shown in place of a password that cannot be decrypted.
pub const UNDECRYPTABLE: &str = "Cannot decrypt";

/// Shown in place of a password when `--redact` is set.
pub const REDACTED: &str = "********";

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table of decrypted credentials.
pub fn print_records_table(vault: &VaultName, records: &[DecryptedRecord], redact: bool) {
    if records.is_empty() {
        info(&format!("Vault '{vault}' has no credentials yet."));
        tip(&format!(
            "Run `pwvault add {vault} <SERVICE> <ACCOUNT>` to add your first one."
        ));
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Service", "Account", "Password", "Created"]);

    for r in records {
        let password = match r.password.as_plaintext() {
            None => style(UNDECRYPTABLE).red().to_string(),
            Some(_) if redact => REDACTED.to_string(),
            Some(pw) => pw.to_string(),
        };
        table.add_row(vec![
            r.service.clone(),
            r.account.clone(),
            password,
            r.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ]);
    }

    println!("{table}");
}

/// Print a one-column table of vault names.
pub fn print_vaults_table(vaults: &[VaultName]) {
    if vaults.is_empty() {
        info("No vaults yet.");
        tip("Run `pwvault create <VAULT>` to create one.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Vault"]);
    for v in vaults {
        table.add_row(vec![v.to_string()]);
    }
    println!("{table}");
}

/// Colorize a strength rating.
pub fn styled_strength(strength: Strength) -> String {
    let label = strength.label();
    match strength {
        Strength::VeryWeak => style(label).red().bold().to_string(),
        Strength::Weak => style(label).red().to_string(),
        Strength::Medium => style(label).yellow().to_string(),
        Strength::Strong => style(label).green().to_string(),
        Strength::VeryStrong => style(label).green().bold().to_string(),
    }
}

/// Print a strength report with its penalties.
pub fn print_strength_report(report: &StrengthReport) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(vec!["Length".to_string(), report.length.to_string()]);
    table.add_row(vec!["Pool size".to_string(), report.pool_size.to_string()]);
    table.add_row(vec![
        "Base entropy".to_string(),
        format!("{:.1} bits", report.base_entropy),
    ]);
    table.add_row(vec![
        "Penalty".to_string(),
        format!("{:.1} bits", report.penalty),
    ]);
    table.add_row(vec![
        "Entropy".to_string(),
        format!("{:.1} bits", report.adjusted_entropy),
    ]);
    table.add_row(vec!["Rating".to_string(), styled_strength(report.strength)]);
    println!("{table}");

    for m in &report.dictionary_matches {
        let kind = match m.kind {
            MatchKind::Full => "is a dictionary word",
            MatchKind::Partial => "contains a dictionary word",
        };
        warning(&format!("Password {kind}: '{}'", m.word));
    }
    for p in &report.repeated_patterns {
        warning(&format!(
            "Repeated pattern '{}' appears {} times",
            p.pattern, p.occurrences
        ));
    }
}
