//! Exchange rate abstractions and core types

use anyhow::{Result, anyhow, ensure};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A single quoted currency against the provider's base currency.
///
/// Always well-formed: the code is non-empty and upper-case, the rate is
/// finite and non-negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawExchangeRate")]
pub struct ExchangeRate {
    currency_code: String,
    rate: f64,
}

#[derive(Deserialize)]
struct RawExchangeRate {
    currency_code: String,
    rate: f64,
}

impl TryFrom<RawExchangeRate> for ExchangeRate {
    type Error = anyhow::Error;

    fn try_from(raw: RawExchangeRate) -> Result<Self> {
        ExchangeRate::new(&raw.currency_code, raw.rate)
    }
}

impl ExchangeRate {
    pub fn new(currency_code: &str, rate: f64) -> Result<Self> {
        let code = currency_code.trim();
        ensure!(!code.is_empty(), "Currency code must not be empty");
        if !rate.is_finite() || rate < 0.0 {
            return Err(anyhow!("Invalid rate {} for currency: {}", rate, code));
        }

        Ok(Self {
            currency_code: code.to_uppercase(),
            rate,
        })
    }

    pub fn currency_code(&self) -> &str {
        &self.currency_code
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }
}

/// Outcome of a single retrieval.
///
/// `Ok(None)` means the provider has no data right now, which is not a
/// failure. `Ok(Some(vec![]))` means the provider answered with zero rates.
pub type RatesResult = Result<Option<Vec<ExchangeRate>>>;

#[async_trait]
pub trait RateSource: Send + Sync {
    async fn get_rates(&self) -> RatesResult;
}

#[async_trait]
impl<T: RateSource + ?Sized> RateSource for &T {
    async fn get_rates(&self) -> RatesResult {
        (**self).get_rates().await
    }
}

#[async_trait]
impl<T: RateSource + ?Sized> RateSource for Box<T> {
    async fn get_rates(&self) -> RatesResult {
        (**self).get_rates().await
    }
}

#[async_trait]
impl<T: RateSource + ?Sized> RateSource for Arc<T> {
    async fn get_rates(&self) -> RatesResult {
        (**self).get_rates().await
    }
}

/// Keeps only the rates whose code is in `codes`, preserving order.
/// Matching ignores case.
pub fn filter_codes(rates: Vec<ExchangeRate>, codes: &[String]) -> Vec<ExchangeRate> {
    if codes.is_empty() {
        return rates;
    }
    rates
        .into_iter()
        .filter(|r| codes.iter().any(|c| c.eq_ignore_ascii_case(r.currency_code())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_code() {
        let rate = ExchangeRate::new(" eur ", 0.92).unwrap();
        assert_eq!(rate.currency_code(), "EUR");
        assert_eq!(rate.rate(), 0.92);
    }

    #[test]
    fn test_new_rejects_invalid_values() {
        assert!(ExchangeRate::new("", 1.0).is_err());
        assert!(ExchangeRate::new("   ", 1.0).is_err());
        assert!(ExchangeRate::new("USD", -0.5).is_err());
        assert!(ExchangeRate::new("USD", f64::NAN).is_err());
        assert!(ExchangeRate::new("USD", f64::INFINITY).is_err());
        assert!(ExchangeRate::new("USD", 0.0).is_ok());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: ExchangeRate =
            serde_json::from_str(r#"{"currency_code": "usd", "rate": 1.0}"#).unwrap();
        assert_eq!(ok.currency_code(), "USD");

        let bad = serde_json::from_str::<ExchangeRate>(r#"{"currency_code": "", "rate": 1.0}"#);
        assert!(bad.is_err());
        let negative =
            serde_json::from_str::<ExchangeRate>(r#"{"currency_code": "USD", "rate": -2.0}"#);
        assert!(negative.is_err());
    }

    #[test]
    fn test_filter_codes() {
        let rates = vec![
            ExchangeRate::new("USD", 1.0).unwrap(),
            ExchangeRate::new("EUR", 0.92).unwrap(),
            ExchangeRate::new("GBP", 0.79).unwrap(),
        ];

        let all = filter_codes(rates.clone(), &[]);
        assert_eq!(all.len(), 3);

        let some = filter_codes(rates, &["gbp".to_string(), "USD".to_string()]);
        let codes: Vec<_> = some.iter().map(|r| r.currency_code()).collect();
        assert_eq!(codes, vec!["USD", "GBP"]);
    }
}
