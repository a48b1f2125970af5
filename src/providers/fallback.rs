use crate::core::{RateSource, RatesResult};
use anyhow::anyhow;
use async_trait::async_trait;
use tracing::{debug, warn};

/// Tries sources in order until one yields a non-empty rate list.
///
/// A "no data" outcome from any source is preferred over failing, and a
/// failure is never reported as "no data".
pub struct FallbackRateSource {
    sources: Vec<(String, Box<dyn RateSource>)>,
}

impl FallbackRateSource {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    pub fn with_source(
        mut self,
        name: impl Into<String>,
        source: impl RateSource + 'static,
    ) -> Self {
        let source: Box<dyn RateSource> = Box::new(source);
        self.sources.push((name.into(), source));
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl Default for FallbackRateSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateSource for FallbackRateSource {
    async fn get_rates(&self) -> RatesResult {
        let mut no_data = None;
        let mut last_error = None;

        for (name, source) in &self.sources {
            match source.get_rates().await {
                Ok(Some(rates)) if !rates.is_empty() => {
                    debug!(source = %name, count = rates.len(), "Rates served");
                    return Ok(Some(rates));
                }
                Ok(outcome) => {
                    debug!(source = %name, "No rates available, trying next source");
                    no_data.get_or_insert(outcome);
                }
                Err(e) => {
                    warn!(source = %name, error = %e, "Rate source failed, trying next source");
                    last_error = Some(e.context(format!("Rate source '{name}' failed")));
                }
            }
        }

        if let Some(outcome) = no_data {
            return Ok(outcome);
        }

        match last_error {
            Some(e) => Err(e.context(format!("All {} rate sources failed", self.sources.len()))),
            None => Err(anyhow!("No rate sources configured")),
        }
    }
}
