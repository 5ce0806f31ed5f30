use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::model::{Location, Weather};

use super::{WeatherProvider, fetch_json};

const CURRENT_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            http: Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    pressure: i64,
    humidity: i64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwClouds {
    all: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    dt: i64,
    timezone: i32,
    /// Metres, capped at 10 km by the API.
    visibility: f64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    clouds: OwClouds,
}

impl TryFrom<OwCurrentResponse> for Weather {
    type Error = anyhow::Error;

    fn try_from(parsed: OwCurrentResponse) -> Result<Self> {
        let observed_at = unix_to_utc(parsed.dt)
            .ok_or_else(|| anyhow!("OpenWeather returned an invalid timestamp: {}", parsed.dt))?;

        let description = parsed
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .ok_or_else(|| anyhow!("OpenWeather returned no weather condition"))?;

        Ok(Weather {
            temperature: parsed.main.temp,
            pressure: parsed.main.pressure,
            humidity: parsed.main.humidity,
            wind_speed: parsed.wind.speed,
            description,
            visibility: parsed.visibility,
            clouds: parsed.clouds.all,
            observed_at,
            timezone_offset: parsed.timezone,
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[tracing::instrument(
        name = "get_weather",
        level = "debug",
        skip_all,
        fields(capital = %location.capital, country = %location.alpha2code)
    )]
    async fn get_weather(&self, location: &Location) -> Result<Weather> {
        let place = format!("{},{}", location.capital, location.alpha2code);

        let request = self.http.get(CURRENT_URL).query(&[
            ("q", place.as_str()),
            ("appid", self.api_key.as_str()),
            ("units", "metric"),
        ]);

        let parsed: OwCurrentResponse = fetch_json(request, "OpenWeather current weather").await?;
        Weather::try_from(parsed)
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONDITIONS: &str =
        r#"[{"id": 802, "main": "Clouds", "description": "scattered clouds", "icon": "03d"}]"#;

    const MARIEHAMN: &str = r#"{
        "coord": {"lon": 19.93, "lat": 60.1},
        "weather": [{"id": 802, "main": "Clouds", "description": "scattered clouds", "icon": "03d"}],
        "main": {"temp": 13.92, "feels_like": 13.1, "pressure": 1023, "humidity": 54},
        "visibility": 10000,
        "wind": {"speed": 4.63, "deg": 250},
        "clouds": {"all": 40},
        "dt": 1663146342,
        "timezone": 10800,
        "name": "Mariehamn",
        "cod": 200
    }"#;

    #[test]
    fn maps_current_response_to_weather() {
        let parsed: OwCurrentResponse = serde_json::from_str(MARIEHAMN).expect("fixture parses");
        let weather = Weather::try_from(parsed).expect("valid weather");

        assert_eq!(weather.temperature, 13.92);
        assert_eq!(weather.pressure, 1023);
        assert_eq!(weather.humidity, 54);
        assert_eq!(weather.wind_speed, 4.63);
        assert_eq!(weather.description, "scattered clouds");
        assert_eq!(weather.visibility, 10000.0);
        assert_eq!(weather.clouds, 40.0);
        assert_eq!(weather.timezone_offset, 10800);
        assert_eq!(weather.observed_at.timestamp(), 1663146342);
    }

    #[test]
    fn missing_condition_is_an_error() {
        let json = MARIEHAMN.replace(CONDITIONS, "[]");
        let parsed: OwCurrentResponse = serde_json::from_str(&json).expect("fixture parses");

        let err = Weather::try_from(parsed).unwrap_err();
        assert!(err.to_string().contains("no weather condition"));
    }

    #[test]
    fn missing_visibility_fails_to_parse() {
        let json = MARIEHAMN.replace(r#""visibility": 10000,"#, "");

        let err = serde_json::from_str::<OwCurrentResponse>(&json).unwrap_err();
        assert!(err.to_string().contains("visibility"));
    }
}
