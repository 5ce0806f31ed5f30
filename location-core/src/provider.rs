use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use std::{convert::TryFrom, fmt::Debug};

use crate::model::{CountryCode, CurrencyRates, Location, NewsInfo, Weather};

pub mod exchangerates;
pub mod newsapi;
pub mod openweather;
pub mod restcountries;

pub use exchangerates::ExchangeRatesProvider;
pub use newsapi::NewsApiProvider;
pub use openweather::OpenWeatherProvider;
pub use restcountries::RestCountriesProvider;

/// Providers that need an API key in the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeather,
    ExchangeRates,
    NewsApi,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::ExchangeRates => "exchangerates",
            ProviderId::NewsApi => "newsapi",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[
            ProviderId::OpenWeather,
            ProviderId::ExchangeRates,
            ProviderId::NewsApi,
        ]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openweather" => Ok(ProviderId::OpenWeather),
            "exchangerates" => Ok(ProviderId::ExchangeRates),
            "newsapi" => Ok(ProviderId::NewsApi),
            _ => Err(anyhow!(
                "Unknown provider '{value}'. Supported providers: openweather, exchangerates, newsapi."
            )),
        }
    }
}

#[async_trait]
pub trait CountryProvider: Send + Sync + Debug {
    /// Look up a country by (part of) its name.
    async fn get_country(&self, query: &str) -> Result<Location>;
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current weather in the location's capital.
    async fn get_weather(&self, location: &Location) -> Result<Weather>;
}

#[async_trait]
pub trait CurrencyProvider: Send + Sync + Debug {
    async fn get_rates(&self, base: &str) -> Result<CurrencyRates>;
}

#[async_trait]
pub trait NewsProvider: Send + Sync + Debug {
    async fn get_news(&self, country: &CountryCode) -> Result<NewsInfo>;
}

/// Send `request`, fail on non-2xx status, and parse the body as `T`.
/// `what` names the call in error messages, e.g. "OpenWeather current weather".
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    request: RequestBuilder,
    what: &str,
) -> Result<T> {
    let res = request
        .send()
        .await
        .with_context(|| format!("Failed to send request to {what}"))?;

    let status = res.status();
    let body = res
        .text()
        .await
        .with_context(|| format!("Failed to read {what} response body"))?;

    if !status.is_success() {
        return Err(anyhow!(
            "{what} request failed with status {status}: {}",
            truncate_body(&body)
        ));
    }

    tracing::debug!(%status, bytes = body.len(), "{what} responded");

    serde_json::from_str(&body).with_context(|| format!("Failed to parse {what} JSON"))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_id_as_str_roundtrip() {
        for id in ProviderId::all() {
            let s = id.as_str();
            let parsed = ProviderId::try_from(s).expect("roundtrip should succeed");
            assert_eq!(*id, parsed);
        }
    }

    #[test]
    fn provider_id_parse_is_case_insensitive() {
        assert_eq!(ProviderId::try_from("NewsAPI").unwrap(), ProviderId::NewsApi);
    }

    #[test]
    fn unknown_provider_error() {
        let err = ProviderId::try_from("doesnotexist").unwrap_err();
        assert!(err.to_string().contains("Unknown provider"));
    }

    #[test]
    fn truncate_body_keeps_short_bodies() {
        assert_eq!(truncate_body("oops"), "oops");
    }

    #[test]
    fn truncate_body_cuts_on_char_boundary() {
        let body = "я".repeat(150);
        let cut = truncate_body(&body);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 100 + 3);
    }
}
