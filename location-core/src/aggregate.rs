use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::{Location, NewsInfo, Weather};

/// Everything known about one place, ready for rendering.
///
/// Location, weather and rates are mandatory and can only be supplied through
/// [`LocationInfo::new`]. News is optional: a missing news feed and an empty one
/// both render as zero news rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationInfo {
    pub location: Location,
    pub weather: Weather,
    /// Currency code to rate against the rates base. Base and date are not kept.
    pub currency_rates: BTreeMap<String, f64>,
    pub news: Option<NewsInfo>,
}

impl LocationInfo {
    pub fn new(
        location: Location,
        weather: Weather,
        currency_rates: BTreeMap<String, f64>,
        news: Option<NewsInfo>,
    ) -> Self {
        Self {
            location,
            weather,
            currency_rates,
            news,
        }
    }

    /// Number of distinct articles available, zero when news is absent.
    pub fn article_count(&self) -> usize {
        self.news.as_ref().map_or(0, |news| news.articles.len())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::{CountryCode, Currency, CurrencyRates, Language, NewsArticle};
    use chrono::{TimeZone, Utc};

    pub(crate) fn aland() -> Location {
        Location {
            capital: "Mariehamn".into(),
            alpha2code: CountryCode::new("AX").expect("valid code"),
            alt_spellings: vec![
                "AX".into(),
                "Aaland".into(),
                "Aland".into(),
                "Ahvenanmaa".into(),
            ],
            currencies: [Currency::new("EUR")].into_iter().collect(),
            flag: "http://assets.promptapi.com/flags/AX.svg".into(),
            languages: [Language::new("Swedish", "svenska")].into_iter().collect(),
            name: "Åland Islands".into(),
            population: 28875,
            subregion: "Northern Europe".into(),
            timezones: vec!["UTC+02:00".into()],
            area: Some(1580.0),
            latitude: Some(60.116667),
            longitude: Some(19.9),
        }
    }

    pub(crate) fn mariehamn_weather() -> Weather {
        Weather {
            temperature: 13.92,
            pressure: 1023,
            humidity: 54,
            wind_speed: 4.63,
            description: "scattered clouds".into(),
            visibility: 10000.0,
            clouds: 40.0,
            observed_at: Utc.with_ymd_and_hms(2022, 9, 14, 9, 5, 42).unwrap(),
            timezone_offset: 7200,
        }
    }

    pub(crate) fn articles(count: usize) -> Vec<NewsArticle> {
        (1..=count)
            .map(|i| NewsArticle {
                author: Some(format!("Author {i}")),
                title: Some(format!("Title {i}")),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn rates_are_flattened_from_provider_payload() {
        let rates = CurrencyRates {
            base: "RUB".into(),
            date: "2022-09-14".into(),
            rates: BTreeMap::from([("EUR".into(), 0.016503)]),
        };

        let info = LocationInfo::new(
            aland(),
            mariehamn_weather(),
            rates.into_rates(),
            None,
        );
        assert_eq!(info.currency_rates.get("EUR"), Some(&0.016503));
        assert_eq!(info.article_count(), 0);
    }

    #[test]
    fn article_count_reflects_distinct_articles() {
        let mut list = articles(4);
        list.push(list[0].clone());

        let news = NewsInfo::new(100, list);
        let info = LocationInfo::new(
            aland(),
            mariehamn_weather(),
            BTreeMap::new(),
            Some(news),
        );
        assert_eq!(info.article_count(), 4);
    }
}
