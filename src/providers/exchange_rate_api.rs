use super::util::{build_client, collect_rates, trim_base_url, with_retry};
use crate::core::config::HttpConfig;
use crate::core::{RateSource, RatesResult};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, instrument, warn};

/// Rates from an open.er-api style `/v6/latest/{base}` endpoint.
///
/// The wire format is an unordered map, so rates come back sorted by code.
pub struct ExchangeRateApiProvider {
    base_url: String,
    base_currency: String,
    client: reqwest::Client,
    retries: usize,
    retry_delay_ms: u64,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str, base_currency: &str, http: &HttpConfig) -> Result<Self> {
        Ok(ExchangeRateApiProvider {
            base_url: trim_base_url(base_url),
            base_currency: base_currency.to_uppercase(),
            client: build_client(http)?,
            retries: http.retries,
            retry_delay_ms: http.retry_delay_ms,
        })
    }
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    result: String,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    base_code: Option<String>,
    rates: Option<BTreeMap<String, Option<f64>>>,
}

#[async_trait]
impl RateSource for ExchangeRateApiProvider {
    #[instrument(
        name = "ExchangeRateApiFetch",
        skip(self),
        fields(base = %self.base_currency)
    )]
    async fn get_rates(&self) -> RatesResult {
        let url = format!("{}/v6/latest/{}", self.base_url, self.base_currency);
        debug!("Requesting rates from {}", url);

        let response = with_retry(
            || self.client.get(&url).send(),
            self.retries,
            self.retry_delay_ms,
        )
        .await
        .with_context(|| format!("Request to ExchangeRate-API failed: {url}"))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} from ExchangeRate-API",
                response.status()
            ));
        }

        let text = response
            .text()
            .await
            .context("Failed to read ExchangeRate-API response")?;

        let data: LatestResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse ExchangeRate-API response: {}", e))?;

        if data.result != "success" {
            return Err(anyhow!(
                "ExchangeRate-API returned {}: {}",
                data.result,
                data.error_type.as_deref().unwrap_or("unknown error")
            ));
        }

        if let Some(base) = &data.base_code {
            if !base.eq_ignore_ascii_case(&self.base_currency) {
                warn!(expected = %self.base_currency, received = %base, "Unexpected base currency");
            }
        }

        let Some(entries) = data.rates else {
            debug!("ExchangeRate-API returned no rate data");
            return Ok(None);
        };

        let rates = collect_rates(entries, "exchange_rate_api");
        debug!(count = rates.len(), "Received ExchangeRate-API rates");
        Ok(Some(rates))
    }
}
