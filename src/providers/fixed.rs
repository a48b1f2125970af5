use crate::core::config::FixedRateEntry;
use crate::core::{ExchangeRate, RateSource, RatesResult};
use anyhow::{Context, Result};
use async_trait::async_trait;

/// Serves the same rates on every call.
#[derive(Debug, Clone)]
pub struct FixedRateSource {
    rates: Option<Vec<ExchangeRate>>,
}

impl FixedRateSource {
    pub fn new(rates: Option<Vec<ExchangeRate>>) -> Self {
        Self { rates }
    }

    pub fn from_entries(entries: Option<&[FixedRateEntry]>) -> Result<Self> {
        let rates = entries
            .map(|entries| {
                entries
                    .iter()
                    .map(|e| {
                        ExchangeRate::new(&e.currency_code, e.rate).with_context(|| {
                            format!("Invalid fixed rate for: '{}'", e.currency_code)
                        })
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()?;
        Ok(Self::new(rates))
    }
}

#[async_trait]
impl RateSource for FixedRateSource {
    async fn get_rates(&self) -> RatesResult {
        Ok(self.rates.clone())
    }
}
