pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::{AppConfig, ProviderKind};
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    Rates {
        provider: Option<ProviderKind>,
        currencies: Vec<String>,
        json: bool,
    },
    Check,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fxrates starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Rates {
            provider,
            currencies,
            json,
        } => {
            let source = providers::build_rate_source(&config, provider)?;
            cli::rates::run(source.as_ref(), &config.base_currency, &currencies, json).await
        }
        AppCommand::Check => cli::check::run(&config).await,
    }
}
