//! Turns a [`LocationInfo`] into the fixed sequence of two-column report rows.
//!
//! Rendering is pure: it only reads the aggregate and returns owned rows, so any
//! number of callers may render the same value at once.

use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;
use thiserror::Error;
use tracing::debug;

use crate::{aggregate::LocationInfo, model::NewsArticle};

/// Placeholder for absent optional values.
const MISSING: &str = "-";

/// Above this many articles only [`NEWS_CAPPED_ROWS`] are listed.
const NEWS_FULL_LIST_LIMIT: usize = 5;
const NEWS_CAPPED_ROWS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("Cannot format `{field}`: {value} is not a finite decimal number")]
    InvalidNumber {
        field: String,
        value: String,
    },
}

/// One report line: a label and its formatted value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub label: String,
    pub value: String,
}

impl Row {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  {}", self.label, self.value)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Renderer<'a> {
    info: &'a LocationInfo,
}

impl<'a> Renderer<'a> {
    pub fn new(info: &'a LocationInfo) -> Self {
        Self { info }
    }

    pub fn render(&self) -> Result<Vec<Row>, RenderError> {
        let location = &self.info.location;
        let weather = &self.info.weather;

        let area = format_optional("area", location.area, "")?;
        let latitude = format_optional("latitude", location.latitude, "°")?;
        let longitude = format_optional("longitude", location.longitude, "°")?;
        let population = format!("{} чел.", group_thousands(location.population));
        let temperature = format_float("temperature", weather.temperature)?;
        let wind_speed = format_float("wind_speed", weather.wind_speed)?;
        let visibility = format_float("visibility", weather.visibility)?;
        let clouds = format_float("clouds", weather.clouds)?;

        let mut rows = vec![
            Row::new(
                "--------Информация о стране/городе",
                "-----------------------------",
            ),
            Row::new("Страна", location.name.as_str()),
            Row::new("Площадь страны", area),
            Row::new("Столица", location.capital.as_str()),
            Row::new("Широта", latitude),
            Row::new("Долгота", longitude),
            Row::new("Регион", location.subregion.as_str()),
            Row::new("Время", weather.observed_at.format("%H:%M").to_string()),
            Row::new("Часовой пояс", weather.timezone_offset.to_string()),
            Row::new("Языки", self.format_languages()),
            Row::new("Население страны", population),
            Row::new("Курсы валют", self.format_currency_rates()?),
            Row::new(
                "----------------------------Погода",
                "----------------------------",
            ),
            Row::new("О погоде", weather.description.as_str()),
            Row::new("Температура", format!("{temperature} °C")),
            Row::new("Скорость ветра", wind_speed),
            Row::new("Видимость", format!("{visibility}м")),
            Row::new("Облачность", clouds),
            Row::new("Давление", format!("{} мм рт. ст.", weather.pressure)),
            Row::new("Влажность", format!("{}%", weather.humidity)),
            Row::new(
                "---------------------------Новости",
                "----------------------------",
            ),
        ];

        rows.extend(self.news_rows());

        debug!(
            rows = rows.len(),
            country = %location.alpha2code,
            "rendered location report"
        );
        Ok(rows)
    }

    fn format_languages(&self) -> String {
        self.info
            .location
            .languages
            .iter()
            .map(|lang| format!("{} ({})", lang.name, lang.native_name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn format_currency_rates(&self) -> Result<String, RenderError> {
        let parts = self
            .info
            .currency_rates
            .iter()
            .map(|(code, rate)| Ok(format!("{code} = {} руб.", round_rate(code, *rate)?)))
            .collect::<Result<Vec<_>, RenderError>>()?;

        Ok(parts.join(", "))
    }

    /// One row per article, reading author and title from the same article.
    fn news_rows(&self) -> impl Iterator<Item = Row> + 'a {
        let info = self.info;
        let articles = info.news.iter().flat_map(|news| news.articles.iter());
        let count = news_row_count(info.article_count());

        articles
            .take(count)
            .enumerate()
            .map(|(i, article)| Row::new((i + 1).to_string(), headline(article)))
    }
}

/// How many news rows to show for `available` distinct articles.
fn news_row_count(available: usize) -> usize {
    if available > NEWS_FULL_LIST_LIMIT {
        NEWS_CAPPED_ROWS
    } else {
        available
    }
}

fn headline(article: &NewsArticle) -> String {
    format!(
        "{} - {}",
        article.author.as_deref().unwrap_or(MISSING),
        article.title.as_deref().unwrap_or(MISSING),
    )
}

/// Rounds half away from zero to exactly two decimals, starting from the exact
/// binary value of `rate`.
fn round_rate(code: &str, rate: f64) -> Result<String, RenderError> {
    let exact = Decimal::from_f64_retain(rate).ok_or_else(|| RenderError::InvalidNumber {
        field: format!("currency_rates[{code}]"),
        value: rate.to_string(),
    })?;

    let strategy = RoundingStrategy::MidpointAwayFromZero;
    let mut rounded = exact.round_dp_with_strategy(2, strategy);
    rounded.rescale(2);
    Ok(rounded.to_string())
}

/// `28875` -> `28.875`.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    grouped
}

/// Shortest round-trip form, keeping one fractional digit on whole numbers (`1580.0`).
fn format_float(field: &str, value: f64) -> Result<String, RenderError> {
    if !value.is_finite() {
        return Err(RenderError::InvalidNumber {
            field: field.to_string(),
            value: value.to_string(),
        });
    }

    if value.fract() == 0.0 && value.abs() < 1e16 {
        Ok(format!("{value:.1}"))
    } else {
        Ok(value.to_string())
    }
}

fn format_optional(field: &str, value: Option<f64>, suffix: &str) -> Result<String, RenderError> {
    match value {
        Some(v) => Ok(format!("{}{suffix}", format_float(field, v)?)),
        None => Ok(MISSING.to_string()),
    }
}
