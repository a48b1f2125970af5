use super::util::{build_client, collect_rates, trim_base_url, with_retry};
use crate::core::config::HttpConfig;
use crate::core::{RateSource, RatesResult};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

/// Rates from a BitPay-style `/rates/{base}` endpoint.
pub struct BitPayProvider {
    base_url: String,
    base_currency: String,
    client: reqwest::Client,
    retries: usize,
    retry_delay_ms: u64,
}

impl BitPayProvider {
    pub fn new(base_url: &str, base_currency: &str, http: &HttpConfig) -> Result<Self> {
        Ok(BitPayProvider {
            base_url: trim_base_url(base_url),
            base_currency: base_currency.to_uppercase(),
            client: build_client(http)?,
            retries: http.retries,
            retry_delay_ms: http.retry_delay_ms,
        })
    }
}

#[derive(Debug, Deserialize)]
struct BitPayResponse {
    #[serde(default)]
    data: Option<Vec<BitPayRate>>,
}

#[derive(Debug, Deserialize)]
struct BitPayRate {
    code: String,
    rate: Option<f64>,
}

#[async_trait]
impl RateSource for BitPayProvider {
    #[instrument(
        name = "BitPayRatesFetch",
        skip(self),
        fields(base = %self.base_currency)
    )]
    async fn get_rates(&self) -> RatesResult {
        let url = format!("{}/rates/{}", self.base_url, self.base_currency);
        debug!("Requesting rates from {}", url);

        let response = with_retry(
            || self.client.get(&url).send(),
            self.retries,
            self.retry_delay_ms,
        )
        .await
        .with_context(|| format!("Request to BitPay failed: {url}"))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: {} from BitPay", response.status()));
        }

        let text = response
            .text()
            .await
            .context("Failed to read BitPay response")?;

        let data: BitPayResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse BitPay response: {}", e))?;

        let Some(entries) = data.data else {
            debug!("BitPay returned no rate data");
            return Ok(None);
        };

        let rates = collect_rates(entries.into_iter().map(|e| (e.code, e.rate)), "bitpay");
        debug!(count = rates.len(), "Received BitPay rates");
        Ok(Some(rates))
    }
}
