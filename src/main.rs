use clap::Parser;
use pwvault::cli::commands::generate::GenerateArgs;
use pwvault::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the diagnostic log filter.
const LOG_ENV: &str = "PWVAULT_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Create { ref vault } => pwvault::cli::commands::create::execute(&cli, vault),
        Commands::Drop { ref vault, force } => {
            pwvault::cli::commands::drop::execute(&cli, vault, force)
        }
        Commands::Vaults => pwvault::cli::commands::vaults::execute(&cli),
        Commands::List {
            ref vault,
            redact,
            json,
        } => pwvault::cli::commands::list::execute(&cli, vault, redact, json),
        Commands::Add {
            ref vault,
            ref service,
            ref account,
            generate,
            length,
        } => pwvault::cli::commands::add::execute(&cli, vault, service, account, generate, length),
        Commands::Update {
            ref vault,
            ref service,
            ref new_service,
            ref new_account,
            password,
        } => pwvault::cli::commands::update::execute(
            &cli,
            vault,
            service,
            new_service.as_deref(),
            new_account.as_deref(),
            password,
        ),
        Commands::Remove {
            ref vault,
            ref service,
            force,
        } => pwvault::cli::commands::remove::execute(&cli, vault, service, force),
        Commands::Generate {
            length,
            no_special,
            no_digits,
            no_letters,
            copy,
        } => pwvault::cli::commands::generate::execute(
            &cli,
            &GenerateArgs {
                length,
                no_special,
                no_digits,
                no_letters,
                copy,
            },
        ),
        Commands::Check { ref password } => {
            pwvault::cli::commands::check::execute(&cli, password.as_deref())
        }
        Commands::Audit {
            last,
            ref since,
            ref vault,
        } => pwvault::cli::commands::audit_cmd::execute(
            &cli,
            last,
            since.as_deref(),
            vault.as_deref(),
        ),
        Commands::Completions { shell } => pwvault::cli::commands::completions::execute(shell),
    };

    if let Err(e) = result {
        pwvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
