use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::{Context, anyhow, bail};
use clap::{Parser, Subcommand};
use cityweather_core::{
    AccuWeatherClient, CityPanel, Config, Dashboard, Horizon, build_dashboard, parse_city_list,
};
use inquire::{Password, PasswordDisplayMode, Select};

use crate::server::{self, AppState};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cityweather", version, about = "City weather forecasts and map dashboard")]
pub struct Cli {
    /// AccuWeather API key; takes precedence over the config file.
    #[arg(long, global = true, env = "ACCUWEATHER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Use this config file instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key and default horizon in the config file.
    Configure,

    /// Print daily forecasts for a comma-separated list of cities.
    Show {
        /// Cities, e.g. "Moscow, Saint Petersburg".
        cities: String,

        /// Forecast horizon: 1, 3 or 5 days. Defaults to the configured value.
        #[arg(long, short, value_parser = parse_horizon)]
        days: Option<Horizon>,
    },

    /// Serve the web dashboard.
    Serve {
        /// Address to listen on. Defaults to the configured value.
        #[arg(long)]
        addr: Option<SocketAddr>,
    },
}

fn parse_horizon(raw: &str) -> Result<Horizon, String> {
    let days: u32 = raw
        .parse()
        .map_err(|_| format!("'{raw}' is not a number of days"))?;
    Horizon::try_from(days).map_err(|e| e.to_string())
}

impl Cli {
    /// Config as stored on disk, without the flag/env key override applied.
    pub fn load_config(&self) -> anyhow::Result<Config> {
        let config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        Ok(config)
    }

    pub async fn run(self, config: Config) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(self.config, config),
            Command::Show { ref cities, days } => {
                let cities = parse_city_list(cities);
                if cities.is_empty() {
                    bail!("No cities given. Example: cityweather show \"Moscow, Kazan\"");
                }
                let days = days.unwrap_or(config.dashboard.default_days);
                let client = client_from(config, self.api_key)?;

                let dashboard = build_dashboard(&client, &cities, days.days()).await;
                print!("{}", render_report(&dashboard));
                Ok(())
            }
            Command::Serve { addr } => {
                let addr = addr.unwrap_or(config.dashboard.bind_addr);
                let settings = Arc::new(config.dashboard.clone());
                let client = client_from(config, self.api_key)?;

                server::serve(
                    AppState {
                        client: Arc::new(client),
                        settings,
                    },
                    addr,
                )
                .await
            }
        }
    }
}

fn client_from(config: Config, api_key: Option<String>) -> anyhow::Result<AccuWeatherClient> {
    let config = config.with_api_key_override(api_key);
    let key = config.api_key().ok_or_else(|| {
        anyhow!(
            "No AccuWeather API key configured.\n\
             Hint: run `cityweather configure` or set ACCUWEATHER_API_KEY."
        )
    })?;

    AccuWeatherClient::new(key, &config.api).context("Failed to build weather client")
}

fn configure(path: Option<PathBuf>, mut config: Config) -> anyhow::Result<()> {
    let api_key = Password::new("AccuWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }
    config.set_api_key(api_key.trim().to_string());

    let horizons = Horizon::all().to_vec();
    let current = horizons
        .iter()
        .position(|h| *h == config.dashboard.default_days)
        .unwrap_or_default();
    config.dashboard.default_days = Select::new("Default forecast horizon (days):", horizons)
        .with_starting_cursor(current)
        .prompt()
        .context("Failed to read forecast horizon")?;

    let saved_to = match path {
        Some(path) => {
            config.save_to(&path)?;
            path
        }
        None => config.save()?,
    };
    println!("Saved configuration to {}", saved_to.display());
    Ok(())
}

/// Plain-text rendering of a dashboard: one table per city, then the mapped locations.
pub fn render_report(dashboard: &Dashboard) -> String {
    let mut out = String::new();

    for panel in &dashboard.panels {
        match panel {
            CityPanel::Ready { city, forecast, .. } => {
                out.push_str(&format!("Forecast: {city} ({} days)\n", forecast.len()));
                out.push_str(&format!(
                    "{:<12}{:>8}{:>8}{:>8}{:>10}\n",
                    "Date", "Min °C", "Max °C", "Wind", "Precip %"
                ));
                for (i, date) in forecast.dates.iter().enumerate() {
                    out.push_str(&format!(
                        "{:<12}{:>8.1}{:>8.1}{:>8.1}{:>10.0}\n",
                        date,
                        forecast.min_temps[i],
                        forecast.max_temps[i],
                        forecast.wind_speeds[i],
                        forecast.precipitation_prob[i],
                    ));
                }
            }
            CityPanel::Failed { message, .. } => {
                out.push_str(message);
                out.push('\n');
            }
        }
        out.push('\n');
    }

    if !dashboard.locations.is_empty() {
        out.push_str("Map locations:\n");
        for loc in &dashboard.locations {
            out.push_str(&format!("  {} ({:.4}, {:.4})\n", loc.name, loc.lat, loc.lon));
        }
    }

    out
}
