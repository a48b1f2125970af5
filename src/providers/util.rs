use crate::core::ExchangeRate;
use crate::core::config::HttpConfig;
use anyhow::{Context, Error};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Retries an async operation with configurable attempts and delays
///
/// # Parameters
/// - `operation`: Closure returning a future
/// - `retries`: Number of retry attempts (total runs = 1 initial + retries)
/// - `delay_ms`: Milliseconds between retry attempts
///
/// # Returns
/// Either the successful result or the error after all attempts
pub async fn with_retry<F, Fut, T>(
    mut operation: F,
    retries: usize,
    delay_ms: u64,
) -> Result<T, Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, reqwest::Error>>,
{
    let mut attempt = 1;
    loop {
        match operation().await.map_err(anyhow::Error::from) {
            Ok(val) => return Ok(val),
            Err(err) => {
                if attempt > retries {
                    return Err(err);
                }
                debug!(
                    "Attempt {}/{} failed: {}. Retrying...",
                    attempt,
                    attempts_total(retries),
                    err
                );
                attempt += 1;
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

fn attempts_total(retries: usize) -> usize {
    retries + 1
}

pub fn build_client(http: &HttpConfig) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(http.user_agent.as_str())
        .timeout(Duration::from_secs(http.timeout_secs))
        .build()
        .context("Failed to build HTTP client")
}

pub fn trim_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Builds rate records from raw provider entries, dropping the malformed ones.
pub fn collect_rates<I>(entries: I, provider: &str) -> Vec<ExchangeRate>
where
    I: IntoIterator<Item = (String, Option<f64>)>,
{
    entries
        .into_iter()
        .filter_map(|(code, rate)| {
            let Some(rate) = rate else {
                warn!(%provider, %code, "Skipping rate without a value");
                return None;
            };
            match ExchangeRate::new(&code, rate) {
                Ok(r) => Some(r),
                Err(e) => {
                    warn!(%provider, error = %e, "Skipping malformed rate");
                    None
                }
            }
        })
        .collect()
}
