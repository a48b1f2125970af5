use anyhow::{Context, Result};
use clap::ValueEnum;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum ProviderKind {
    #[value(name = "bitpay")]
    #[serde(rename = "bitpay")]
    BitPay,
    ExchangeRateApi,
    Fixed,
}

impl Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ProviderKind::BitPay => "bitpay",
                ProviderKind::ExchangeRateApi => "exchange_rate_api",
                ProviderKind::Fixed => "fixed",
            }
        )
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BitPayProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ExchangeRateApiProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FixedRateEntry {
    pub currency_code: String,
    pub rate: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FixedProviderConfig {
    /// `None` makes the source report "no data"
    pub rates: Option<Vec<FixedRateEntry>>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub bitpay: Option<BitPayProviderConfig>,
    pub exchange_rate_api: Option<ExchangeRateApiProviderConfig>,
    pub fixed: Option<FixedProviderConfig>,
}

impl ProvidersConfig {
    pub fn is_configured(&self, kind: ProviderKind) -> bool {
        match kind {
            ProviderKind::BitPay => self.bitpay.is_some(),
            ProviderKind::ExchangeRateApi => self.exchange_rate_api.is_some(),
            ProviderKind::Fixed => self.fixed.is_some(),
        }
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            bitpay: Some(BitPayProviderConfig {
                base_url: "https://bitpay.com".to_string(),
            }),
            exchange_rate_api: Some(ExchangeRateApiProviderConfig {
                base_url: "https://open.er-api.com".to_string(),
            }),
            fixed: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    /// Extra attempts after the first one
    pub retries: usize,
    pub retry_delay_ms: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            timeout_secs: 10,
            retries: 2,
            retry_delay_ms: 500,
            user_agent: "fxrates/1.0".to_string(),
        }
    }
}

fn default_priority() -> Vec<ProviderKind> {
    vec![
        ProviderKind::BitPay,
        ProviderKind::ExchangeRateApi,
        ProviderKind::Fixed,
    ]
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub base_currency: String,
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Order in which configured providers are tried
    #[serde(default = "default_priority")]
    pub priority: Vec<ProviderKind>,
    /// Zero disables caching
    #[serde(default)]
    pub cache_ttl_secs: u64,
    #[serde(default)]
    pub http: HttpConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "fxrates", "fxrates")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization_defaults() {
        let yaml_str = r#"
base_currency: "BTC"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.base_currency, "BTC");
        assert_eq!(
            config.providers.bitpay.unwrap().base_url,
            "https://bitpay.com"
        );
        assert_eq!(
            config.providers.exchange_rate_api.unwrap().base_url,
            "https://open.er-api.com"
        );
        assert!(config.providers.fixed.is_none());
        assert_eq!(config.priority, default_priority());
        assert_eq!(config.cache_ttl_secs, 0);
        assert_eq!(config.http.timeout_secs, 10);
        assert_eq!(config.http.retries, 2);
    }

    #[test]
    fn test_config_deserialization_full() {
        let yaml_str = r#"
base_currency: "USD"
providers:
  exchange_rate_api:
    base_url: "http://example.com/er"
  fixed:
    rates:
      - currency_code: "USD"
        rate: 1.0
      - currency_code: "EUR"
        rate: 0.92
priority: [fixed, exchange_rate_api]
cache_ttl_secs: 300
http:
  retries: 0
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert!(config.providers.bitpay.is_none());
        assert_eq!(
            config.providers.exchange_rate_api.unwrap().base_url,
            "http://example.com/er"
        );
        let fixed = config.providers.fixed.unwrap().rates.unwrap();
        assert_eq!(fixed.len(), 2);
        assert_eq!(fixed[1].currency_code, "EUR");
        assert_eq!(
            config.priority,
            vec![ProviderKind::Fixed, ProviderKind::ExchangeRateApi]
        );
        assert_eq!(config.cache_ttl_secs, 300);
        assert_eq!(config.http.retries, 0);
        assert_eq!(config.http.timeout_secs, 10);
    }

    #[test]
    fn test_unknown_provider_in_priority_fails() {
        let yaml_str = r#"
base_currency: "USD"
priority: [coinbase]
"#;
        assert!(serde_yaml::from_str::<AppConfig>(yaml_str).is_err());
    }

    #[test]
    fn test_provider_kind_cli_names_match_config_keys() {
        for kind in [
            ProviderKind::BitPay,
            ProviderKind::ExchangeRateApi,
            ProviderKind::Fixed,
        ] {
            let name = kind.to_string();
            assert_eq!(ProviderKind::from_str(&name, false), Ok(kind));
            let from_yaml: ProviderKind = serde_yaml::from_str(&name).unwrap();
            assert_eq!(from_yaml, kind);
        }
        assert_eq!(
            ProviderKind::from_str("exchange_rate_api", false),
            Ok(ProviderKind::ExchangeRateApi)
        );
        assert!(ProviderKind::from_str("exchange-rate-api", false).is_err());
    }

    #[test]
    fn test_load_from_missing_path() {
        let result = AppConfig::load_from_path("/definitely/not/here/config.yaml");
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }
}
