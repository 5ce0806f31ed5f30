use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::model::CurrencyRates;

use super::{CurrencyProvider, fetch_json};

const LATEST_URL: &str = "https://api.apilayer.com/exchangerates_data/latest";

/// Latest exchange rates from the apilayer Exchange Rates Data API.
#[derive(Debug, Clone)]
pub struct ExchangeRatesProvider {
    api_key: String,
    http: Client,
}

impl ExchangeRatesProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            http: Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErError {
    #[serde(default)]
    info: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErLatestResponse {
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    error: Option<ErError>,
    #[serde(default)]
    base: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    rates: BTreeMap<String, f64>,
}

fn default_success() -> bool {
    true
}

impl TryFrom<ErLatestResponse> for CurrencyRates {
    type Error = anyhow::Error;

    fn try_from(parsed: ErLatestResponse) -> Result<Self> {
        if !parsed.success {
            let info = parsed
                .error
                .and_then(|e| e.info)
                .unwrap_or_else(|| "no details".to_string());
            return Err(anyhow!("Exchange Rates API reported a failure: {info}"));
        }

        Ok(CurrencyRates {
            base: parsed.base,
            date: parsed.date,
            rates: parsed.rates,
        })
    }
}

#[async_trait]
impl CurrencyProvider for ExchangeRatesProvider {
    #[tracing::instrument(name = "get_rates", level = "debug", skip(self))]
    async fn get_rates(&self, base: &str) -> Result<CurrencyRates> {
        let request = self
            .http
            .get(LATEST_URL)
            .header("apikey", self.api_key.as_str())
            .query(&[("base", base)]);

        let parsed: ErLatestResponse = fetch_json(request, "Exchange Rates API").await?;
        CurrencyRates::try_from(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_latest_response_to_rates() {
        let json = r#"{
            "success": true,
            "timestamp": 1663146342,
            "base": "RUB",
            "date": "2022-09-14",
            "rates": {"EUR": 0.016503, "USD": 0.016487}
        }"#;
        let parsed: ErLatestResponse = serde_json::from_str(json).expect("fixture parses");
        let rates = CurrencyRates::try_from(parsed).expect("successful response");

        assert_eq!(rates.base, "RUB");
        assert_eq!(rates.date, "2022-09-14");
        assert_eq!(rates.rates.get("EUR"), Some(&0.016503));
        assert_eq!(rates.rates.len(), 2);
    }

    #[test]
    fn unsuccessful_response_is_an_error() {
        let json = r#"{
            "success": false,
            "error": {"code": 201, "type": "invalid_base_currency", "info": "An invalid base currency has been entered."}
        }"#;
        let parsed: ErLatestResponse = serde_json::from_str(json).expect("fixture parses");

        let err = CurrencyRates::try_from(parsed).unwrap_err();
        assert!(err.to_string().contains("invalid base currency"));
    }
}
