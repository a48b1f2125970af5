use super::ui;
use crate::core::RateSource;
use crate::core::config::{AppConfig, ProviderKind};
use crate::providers::build_provider;
use comfy_table::Cell;
use futures::future::join_all;
use std::time::{Duration, Instant};

/// What a single provider returned when queried on its own.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderStatus {
    Rates(usize),
    NoData,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct ProviderCheck {
    pub provider: ProviderKind,
    pub status: ProviderStatus,
    pub elapsed: Duration,
}

/// Queries every configured provider concurrently, bypassing the fallback chain.
pub async fn check_providers(config: &AppConfig) -> Vec<ProviderCheck> {
    let kinds: Vec<ProviderKind> = config
        .priority
        .iter()
        .copied()
        .filter(|kind| config.providers.is_configured(*kind))
        .collect();

    let pb = ui::new_progress_bar(kinds.len() as u64);
    pb.set_message("Checking providers...");

    let futures = kinds.into_iter().map(|provider| {
        let pb_clone = pb.clone();
        async move {
            let started = Instant::now();
            let status = match build_provider(config, provider) {
                Ok(source) => match source.get_rates().await {
                    Ok(Some(rates)) => ProviderStatus::Rates(rates.len()),
                    Ok(None) => ProviderStatus::NoData,
                    Err(e) => ProviderStatus::Failed(format!("{e:#}")),
                },
                Err(e) => ProviderStatus::Failed(format!("{e:#}")),
            };
            pb_clone.inc(1);
            ProviderCheck {
                provider,
                status,
                elapsed: started.elapsed(),
            }
        }
    });

    let checks = join_all(futures).await;
    pb.finish_and_clear();
    checks
}

pub fn display_as_table(checks: &[ProviderCheck]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Provider"),
        ui::header_cell("Status"),
        ui::header_cell("Time (ms)"),
    ]);

    for check in checks {
        let status = match &check.status {
            ProviderStatus::Rates(count) => ui::status_cell(&format!("{count} rates"), false),
            ProviderStatus::NoData => ui::status_cell("no data", false),
            ProviderStatus::Failed(e) => ui::status_cell(&format!("failed: {e}"), true),
        };
        table.add_row(vec![
            Cell::new(check.provider.to_string()),
            status,
            Cell::new(check.elapsed.as_millis()),
        ]);
    }

    table.to_string()
}

pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let checks = check_providers(config).await;
    if checks.is_empty() {
        println!("No providers configured.");
        return Ok(());
    }
    println!("{}", display_as_table(&checks));
    Ok(())
}
