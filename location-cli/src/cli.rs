use anyhow::Context;
use clap::{Parser, Subcommand};
use location_core::{Collector, Config, ProviderId, Renderer};
use tracing::debug;

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "location", version, about = "Country, weather, currency and news report")]
pub struct Cli {
    /// Log provider calls and timings to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key for a provider.
    Configure {
        /// Provider short name: "openweather", "exchangerates" or "newsapi".
        provider: String,
    },

    /// Show the report for a country.
    Show {
        /// Country name, e.g. "Aland" or "Finland".
        country: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { provider } => configure(&provider),
            Command::Show { country } => show(&country).await,
        }
    }
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    let mut config = Config::load()?;

    let prompt = format!("API key for {id}:");
    let api_key = inquire::Password::new(&prompt)
        .without_confirmation()
        .with_display_mode(inquire::PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim();
    if api_key.is_empty() {
        anyhow::bail!("API key for '{id}' must not be empty");
    }

    config.upsert_provider_api_key(id, api_key.to_string());
    config.save()?;

    debug!(provider = %id, "api key saved");
    println!(
        "Saved API key for {id} to {}",
        Config::config_file_path()?.display()
    );
    Ok(())
}

async fn show(country: &str) -> anyhow::Result<()> {
    let config = Config::load()?;
    let collector = Collector::from_config(&config)?;

    let info = collector.collect(country).await?;
    debug!(
        country = %info.location.alpha2code,
        news = info.news.is_some(),
        "collected report data"
    );

    let rows = Renderer::new(&info)
        .render()
        .context("Failed to render report")?;
    debug!(rows = rows.len(), "printing report");

    print!("{}", output::table(&rows));
    Ok(())
}
