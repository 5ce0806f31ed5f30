//! Core library for the `location` CLI.
//!
//! This crate defines:
//! - The validated data model (country, weather, rates, news)
//! - The `LocationInfo` aggregate and the report renderer
//! - Provider clients and the collector that runs them
//! - Configuration & credentials handling
//!
//! It is used by `location-cli`, but can also be reused by other binaries or services.

pub mod aggregate;
pub mod collector;
pub mod config;
pub mod model;
pub mod provider;
pub mod render;

pub use aggregate::LocationInfo;
pub use collector::Collector;
pub use config::{Config, ProviderConfig};
pub use model::{
    CountryCode, Currency, CurrencyRates, Language, Location, ModelError, NewsArticle, NewsInfo,
    Weather,
};
pub use provider::{CountryProvider, CurrencyProvider, NewsProvider, ProviderId, WeatherProvider};
pub use render::{RenderError, Renderer, Row};
