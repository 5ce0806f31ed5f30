//! Fetches everything needed for one [`LocationInfo`] from the configured providers.

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::{
    Config, LocationInfo,
    model::{CountryCode, NewsInfo},
    provider::{
        CountryProvider, CurrencyProvider, ExchangeRatesProvider, NewsApiProvider, NewsProvider,
        OpenWeatherProvider, ProviderId, RestCountriesProvider, WeatherProvider,
    },
};

/// Rates are quoted against this currency; the report prints them in roubles.
pub const BASE_CURRENCY: &str = "RUB";

#[derive(Debug)]
pub struct Collector {
    countries: Box<dyn CountryProvider>,
    weather: Box<dyn WeatherProvider>,
    rates: Box<dyn CurrencyProvider>,
    news: Option<Box<dyn NewsProvider>>,
}

impl Collector {
    pub fn new(
        countries: Box<dyn CountryProvider>,
        weather: Box<dyn WeatherProvider>,
        rates: Box<dyn CurrencyProvider>,
        news: Option<Box<dyn NewsProvider>>,
    ) -> Self {
        Self {
            countries,
            weather,
            rates,
            news,
        }
    }

    /// Wire HTTP providers from config. Weather and rates keys are required;
    /// news is skipped when no key is configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let weather_key = config.require_api_key(ProviderId::OpenWeather)?;
        let rates_key = config.require_api_key(ProviderId::ExchangeRates)?;

        let news = config.provider_api_key(ProviderId::NewsApi).map(|key| {
            Box::new(NewsApiProvider::new(key.to_owned())) as Box<dyn NewsProvider>
        });
        if news.is_none() {
            debug!("no '{}' key configured, news will be skipped", ProviderId::NewsApi);
        }

        Ok(Self::new(
            Box::new(RestCountriesProvider::new()),
            Box::new(OpenWeatherProvider::new(weather_key.to_owned())),
            Box::new(ExchangeRatesProvider::new(rates_key.to_owned())),
            news,
        ))
    }

    /// Look up the country, then fetch weather, rates and news concurrently.
    /// A news failure is logged and reported as no news.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn collect(&self, query: &str) -> Result<LocationInfo> {
        let location = self
            .countries
            .get_country(query)
            .await
            .with_context(|| format!("Failed to look up country '{query}'"))?;

        let (weather, rates, news) = tokio::join!(
            self.weather.get_weather(&location),
            self.rates.get_rates(BASE_CURRENCY),
            self.fetch_news(&location.alpha2code),
        );

        let weather = weather
            .with_context(|| format!("Failed to fetch weather for '{}'", location.capital))?;
        let rates = rates.context("Failed to fetch currency rates")?;

        let currency_rates = rates.rates_for(&location.currencies);
        debug!(
            country = %location.alpha2code,
            rates = currency_rates.len(),
            articles = news.as_ref().map_or(0, |n| n.articles.len()),
            "collected location info"
        );

        Ok(LocationInfo::new(location, weather, currency_rates, news))
    }

    async fn fetch_news(&self, country: &CountryCode) -> Option<NewsInfo> {
        let provider = self.news.as_ref()?;

        match provider.get_news(country).await {
            Ok(news) => Some(news),
            Err(err) => {
                warn!(%country, "news unavailable: {err:#}");
                None
            }
        }
    }
}
