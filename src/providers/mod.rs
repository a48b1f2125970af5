pub mod bitpay;
pub mod caching;
pub mod exchange_rate_api;
pub mod fallback;
pub mod fixed;
pub mod util;

use crate::core::RateSource;
use crate::core::config::{AppConfig, ProviderKind};
use anyhow::{Context, Result, anyhow};
use bitpay::BitPayProvider;
use caching::CachingRateSource;
use exchange_rate_api::ExchangeRateApiProvider;
use fallback::FallbackRateSource;
use fixed::FixedRateSource;
use std::time::Duration;
use tracing::debug;

/// Builds the single configured provider of the given kind.
pub fn build_provider(config: &AppConfig, kind: ProviderKind) -> Result<Box<dyn RateSource>> {
    let base = &config.base_currency;
    let missing = || anyhow!("Provider '{}' is not configured", kind);

    let source: Box<dyn RateSource> = match kind {
        ProviderKind::BitPay => {
            let p = config.providers.bitpay.as_ref().ok_or_else(missing)?;
            Box::new(BitPayProvider::new(&p.base_url, base, &config.http)?)
        }
        ProviderKind::ExchangeRateApi => {
            let p = config
                .providers
                .exchange_rate_api
                .as_ref()
                .ok_or_else(missing)?;
            Box::new(ExchangeRateApiProvider::new(&p.base_url, base, &config.http)?)
        }
        ProviderKind::Fixed => {
            let p = config.providers.fixed.as_ref().ok_or_else(missing)?;
            Box::new(FixedRateSource::from_entries(p.rates.as_deref())?)
        }
    };
    Ok(source)
}

/// Builds the rate source the app queries: either the one requested provider,
/// or every configured provider in priority order. Wrapped in a cache when
/// `cache_ttl_secs` is non-zero.
pub fn build_rate_source(
    config: &AppConfig,
    only: Option<ProviderKind>,
) -> Result<Box<dyn RateSource>> {
    let source: Box<dyn RateSource> = match only {
        Some(kind) => build_provider(config, kind)?,
        None => {
            let mut chain = FallbackRateSource::new();
            for kind in &config.priority {
                if !config.providers.is_configured(*kind) {
                    debug!(provider = %kind, "Skipping unconfigured provider");
                    continue;
                }
                let provider = build_provider(config, *kind)
                    .with_context(|| format!("Failed to set up provider '{kind}'"))?;
                chain = chain.with_source(kind.to_string(), provider);
            }
            debug!(count = chain.len(), "Built fallback chain");
            Box::new(chain)
        }
    };

    if config.cache_ttl_secs > 0 {
        Ok(Box::new(CachingRateSource::new(
            source,
            Duration::from_secs(config.cache_ttl_secs),
        )))
    } else {
        Ok(source)
    }
}
