use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::model::{CountryCode, Currency, Language, Location};

use super::{CountryProvider, fetch_json};

const BASE_URL: &str = "https://restcountries.com/v2";

/// Country facts from the REST Countries v2 API. No API key required.
#[derive(Debug, Clone)]
pub struct RestCountriesProvider {
    http: Client,
}

impl RestCountriesProvider {
    pub fn new() -> Self {
        Self {
            http: Client::new(),
        }
    }
}

impl Default for RestCountriesProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct RcCurrency {
    code: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RcLanguage {
    name: String,
    native_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RcCountry {
    name: String,
    alpha2_code: String,
    #[serde(default)]
    capital: String,
    #[serde(default)]
    alt_spellings: Vec<String>,
    #[serde(default)]
    currencies: Vec<RcCurrency>,
    #[serde(default)]
    flag: String,
    #[serde(default)]
    languages: Vec<RcLanguage>,
    #[serde(default)]
    population: u64,
    #[serde(default)]
    subregion: String,
    #[serde(default)]
    timezones: Vec<String>,
    area: Option<f64>,
    #[serde(default)]
    latlng: Vec<f64>,
}

impl TryFrom<RcCountry> for Location {
    type Error = anyhow::Error;

    fn try_from(c: RcCountry) -> Result<Self> {
        let alpha2code = CountryCode::new(c.alpha2_code)
            .with_context(|| format!("REST Countries returned a bad code for '{}'", c.name))?;

        Ok(Location {
            capital: c.capital,
            alpha2code,
            alt_spellings: c.alt_spellings,
            currencies: c
                .currencies
                .into_iter()
                .filter_map(|cur| cur.code)
                .map(Currency::new)
                .collect(),
            flag: c.flag,
            languages: c
                .languages
                .into_iter()
                .map(|lang| Language::new(lang.name, lang.native_name))
                .collect(),
            name: c.name,
            population: c.population,
            subregion: c.subregion,
            timezones: c.timezones,
            area: c.area,
            latitude: c.latlng.first().copied(),
            longitude: c.latlng.get(1).copied(),
        })
    }
}

/// `{BASE_URL}/name/{query}` with `query` escaped as one path segment.
fn country_url(query: &str) -> Result<Url> {
    let mut url = Url::parse(BASE_URL).context("Invalid REST Countries base URL")?;
    url.path_segments_mut()
        .map_err(|()| anyhow!("REST Countries base URL cannot have a path"))?
        .push("name")
        .push(query);

    Ok(url)
}

/// First match wins; the API orders exact matches first.
fn first_country(countries: Vec<RcCountry>, query: &str) -> Result<Location> {
    let country = countries
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("REST Countries returned no country for '{query}'"))?;

    Location::try_from(country)
}

#[async_trait]
impl CountryProvider for RestCountriesProvider {
    #[tracing::instrument(name = "get_country", level = "debug", skip(self))]
    async fn get_country(&self, query: &str) -> Result<Location> {
        let request = self.http.get(country_url(query)?);
        let countries: Vec<RcCountry> = fetch_json(request, "REST Countries").await?;

        first_country(countries, query)
    }
}
