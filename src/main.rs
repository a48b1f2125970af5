use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxrates::core::config::ProviderKind;
use fxrates::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Fetch and display current exchange rates
    Rates {
        /// Query only this provider instead of the fallback chain
        #[arg(short, long, value_enum)]
        provider: Option<ProviderKind>,

        /// Only show these currency codes (repeatable)
        #[arg(long = "currency")]
        currencies: Vec<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Query every configured provider and report its status
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => fxrates::cli::setup::setup(),
        Some(Commands::Rates {
            provider,
            currencies,
            json,
        }) => {
            fxrates::run_command(
                fxrates::AppCommand::Rates {
                    provider,
                    currencies,
                    json,
                },
                cli.config_path.as_deref(),
            )
            .await
        }
        Some(Commands::Check) => {
            fxrates::run_command(fxrates::AppCommand::Check, cli.config_path.as_deref()).await
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
