use super::ui;
use crate::core::rate::filter_codes;
use crate::core::{ExchangeRate, RateSource};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use comfy_table::Cell;
use serde::Serialize;
use tracing::info;

/// A fetched rate list with the context needed to display it.
#[derive(Debug, Serialize)]
pub struct RatesReport {
    pub base_currency: String,
    pub fetched_at: DateTime<Utc>,
    /// `None` when the source had no data
    pub rates: Option<Vec<ExchangeRate>>,
}

impl RatesReport {
    pub fn display_as_table(&self) -> String {
        let mut output = format!(
            "Exchange rates for {}\n",
            ui::style_text(&self.base_currency, ui::StyleType::Title)
        );
        output.push_str(&ui::style_text(
            &format!("Fetched at {}", self.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")),
            ui::StyleType::Subtle,
        ));
        output.push_str("\n\n");

        match &self.rates {
            None => output.push_str(&ui::style_text(
                "No exchange rate data is currently available.",
                ui::StyleType::Error,
            )),
            Some(rates) if rates.is_empty() => output.push_str("No exchange rates returned."),
            Some(rates) => {
                let mut table = ui::new_styled_table();
                table.set_header(vec![ui::header_cell("Currency"), ui::header_cell("Rate")]);
                for rate in rates {
                    table.add_row(vec![
                        Cell::new(rate.currency_code()),
                        ui::rate_cell(rate.rate()),
                    ]);
                }
                output.push_str(&table.to_string());
            }
        }

        output
    }

    pub fn display_as_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize rates")
    }
}

pub async fn fetch_report(
    source: &dyn RateSource,
    base_currency: &str,
    currencies: &[String],
) -> Result<RatesReport> {
    let pb = ui::new_spinner("Fetching exchange rates...");
    let result = source.get_rates().await;
    pb.finish_and_clear();

    let rates = result?.map(|rates| filter_codes(rates, currencies));
    info!(
        count = rates.as_ref().map(Vec::len),
        "Fetched exchange rates"
    );

    Ok(RatesReport {
        base_currency: base_currency.to_uppercase(),
        fetched_at: Utc::now(),
        rates,
    })
}

pub async fn run(
    source: &dyn RateSource,
    base_currency: &str,
    currencies: &[String],
    json: bool,
) -> Result<()> {
    let report = fetch_report(source, base_currency, currencies).await?;
    if json {
        println!("{}", report.display_as_json()?);
    } else {
        println!("{}", report.display_as_table());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::fixed::FixedRateSource;

    fn usd_eur() -> FixedRateSource {
        FixedRateSource::new(Some(vec![
            ExchangeRate::new("USD", 1.0).unwrap(),
            ExchangeRate::new("EUR", 0.92).unwrap(),
        ]))
    }

    #[tokio::test]
    async fn test_fetch_report_filters_codes() {
        let report = fetch_report(&usd_eur(), "btc", &["eur".to_string()])
            .await
            .unwrap();
        assert_eq!(report.base_currency, "BTC");
        let rates = report.rates.unwrap();
        assert_eq!(rates.len(), 1);
        assert_eq!(rates[0].currency_code(), "EUR");
    }

    #[tokio::test]
    async fn test_table_output() {
        let report = fetch_report(&usd_eur(), "BTC", &[]).await.unwrap();
        let table = report.display_as_table();
        assert!(table.contains("USD"));
        assert!(table.contains("0.9200"));

        let no_data = fetch_report(&FixedRateSource::new(None), "BTC", &[])
            .await
            .unwrap();
        assert!(
            no_data
                .display_as_table()
                .contains("No exchange rate data is currently available.")
        );
    }

    #[tokio::test]
    async fn test_json_output() {
        let report = fetch_report(&usd_eur(), "BTC", &[]).await.unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&report.display_as_json().unwrap()).unwrap();
        assert_eq!(json["base_currency"], "BTC");
        assert_eq!(json["rates"][0]["currency_code"], "USD");
        assert_eq!(json["rates"][1]["rate"], 0.92);

        let no_data = fetch_report(&FixedRateSource::new(None), "BTC", &[])
            .await
            .unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&no_data.display_as_json().unwrap()).unwrap();
        assert!(json["rates"].is_null());
    }
}
