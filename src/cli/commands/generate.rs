//! `pwvault generate` — print a random password.

use crate::cli::output;
use crate::cli::{load_settings, Cli};
use crate::errors::{PwVaultError, Result};
use crate::password::{generate, GeneratorOptions, Strength};

/// Flags accepted by `generate`.
pub struct GenerateArgs {
    pub length: Option<usize>,
    pub no_special: bool,
    pub no_digits: bool,
    pub no_letters: bool,
    pub copy: bool,
}

/// Execute the `generate` command.
pub fn execute(cli: &Cli, args: &GenerateArgs) -> Result<()> {
    let length = match args.length {
        Some(n) => n,
        None => {
            let cwd = std::env::current_dir()?;
            load_settings(cli, &cwd)?.default_password_length
        }
    };

    let options = GeneratorOptions {
        length,
        exclude_special: args.no_special,
        exclude_digits: args.no_digits,
        exclude_letters: args.no_letters,
    };
    let password = generate(&options)?;

    println!("{}", password.as_str());

    let entropy = options.entropy();
    output::info(&format!(
        "Entropy: {entropy:.1} bits ({})",
        output::styled_strength(Strength::from_entropy(entropy))
    ));

    if args.copy {
        copy_to_clipboard(&password)?;
        output::success("Copied to clipboard");
    }

    Ok(())
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new()
        .map_err(|e| PwVaultError::CommandFailed(format!("clipboard unavailable: {e}")))?;
    clipboard
        .set_text(text.to_string())
        .map_err(|e| PwVaultError::CommandFailed(format!("failed to copy to clipboard: {e}")))?;
    Ok(())
}
