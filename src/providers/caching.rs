use crate::core::cache::Cache;
use crate::core::{ExchangeRate, RateSource, RatesResult};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

const RATES_KEY: &str = "rates";

/// Memoizes successful outcomes of the inner source for `ttl`.
///
/// Failures are never cached.
#[derive(Clone)]
pub struct CachingRateSource<T: RateSource> {
    inner: T,
    cache: Cache<&'static str, Option<Vec<ExchangeRate>>>,
    ttl: Duration,
}

impl<T: RateSource> CachingRateSource<T> {
    pub fn new(inner: T, ttl: Duration) -> Self {
        Self {
            inner,
            cache: Cache::new(),
            ttl,
        }
    }
}

#[async_trait]
impl<T: RateSource> RateSource for CachingRateSource<T> {
    async fn get_rates(&self) -> RatesResult {
        if let Some(cached) = self.cache.get(&RATES_KEY).await {
            return Ok(cached);
        }

        let outcome = self.inner.get_rates().await?;
        debug!(ttl = ?self.ttl, "Caching rates outcome");
        self.cache.put(RATES_KEY, outcome.clone(), Some(self.ttl)).await;
        Ok(outcome)
    }
}
