//! `pwvault check` — estimate the strength of a password.

use crate::cli::output;
use crate::cli::{load_settings, read_secret_value, Cli};
use crate::errors::Result;
use crate::password::{evaluate, Dictionary};

/// Execute the `check` command.
pub fn execute(cli: &Cli, password: Option<&str>) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let settings = load_settings(cli, &cwd)?;
    let dictionary = Dictionary::load_or_empty(settings.dictionary(&cwd).as_deref());

    let report = match password {
        Some(pw) => {
            output::warning("Password provided on command line — it may appear in shell history.");
            evaluate(pw, &dictionary)
        }
        None => {
            let pw = read_secret_value("Password to check")?;
            evaluate(&pw, &dictionary)
        }
    };

    output::print_strength_report(&report);

    Ok(())
}
