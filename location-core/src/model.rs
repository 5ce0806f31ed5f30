use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};
use thiserror::Error;

/// Validation failure raised while constructing a model record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("Invalid field `{field}`: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },
}

/// ISO 3166-1 alpha-2 country code. Always exactly two characters, case preserved.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    pub fn new(code: impl Into<String>) -> Result<Self, ModelError> {
        let code = code.into();
        let len = code.chars().count();
        if len != 2 {
            return Err(ModelError::InvalidField {
                field: "alpha2code",
                reason: format!("expected exactly 2 characters, got {len} in '{code}'"),
            });
        }

        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CountryCode {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for CountryCode {
    type Error = ModelError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> Self {
        code.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
}

impl Currency {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
        }
    }
}

/// A spoken language. The same language listed with two native spellings
/// stays as two distinct entries.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Language {
    pub name: String,
    pub native_name: String,
}

impl Language {
    pub fn new(name: impl Into<String>, native_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            native_name: native_name.into(),
        }
    }
}

/// Country facts as returned by the country provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub capital: String,
    pub alpha2code: CountryCode,
    pub alt_spellings: Vec<String>,
    pub currencies: BTreeSet<Currency>,
    /// URL of the flag image.
    pub flag: String,
    pub languages: BTreeSet<Language>,
    pub name: String,
    pub population: u64,
    pub subregion: String,
    pub timezones: Vec<String>,
    /// Square kilometres.
    pub area: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Exchange rates against `base`: one unit of a listed currency equals `rate` base units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyRates {
    pub base: String,
    /// Provider-formatted date, kept as-is.
    pub date: String,
    pub rates: BTreeMap<String, f64>,
}

impl CurrencyRates {
    /// Rates restricted to the given currencies. Codes the provider does not quote are skipped.
    pub fn rates_for(&self, currencies: &BTreeSet<Currency>) -> BTreeMap<String, f64> {
        currencies
            .iter()
            .filter_map(|c| {
                self.rates
                    .get(&c.code)
                    .map(|rate| (c.code.clone(), *rate))
            })
            .collect()
    }

    pub fn into_rates(self) -> BTreeMap<String, f64> {
        self.rates
    }
}

/// A news article. Providers omit fields freely, so every field is optional.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct NewsArticle {
    pub id: Option<String>,
    pub name: Option<String>,
    pub author: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub published_at: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsInfo {
    /// Provider-reported total; may exceed `articles.len()`.
    pub total_results: u64,
    pub articles: BTreeSet<NewsArticle>,
}

impl NewsInfo {
    pub fn new(total_results: u64, articles: impl IntoIterator<Item = NewsArticle>) -> Self {
        Self {
            total_results,
            articles: articles.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    /// Degrees Celsius.
    pub temperature: f64,
    /// hPa.
    pub pressure: i64,
    /// Percent.
    pub humidity: i64,
    /// Metres per second.
    pub wind_speed: f64,
    pub description: String,
    /// Metres.
    pub visibility: f64,
    /// Cloud coverage, percent.
    pub clouds: f64,
    pub observed_at: DateTime<Utc>,
    /// Shift from UTC in seconds.
    pub timezone_offset: i32,
}
