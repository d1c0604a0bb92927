//! Core library for the `cityweather` CLI and dashboard.
//!
//! This crate defines:
//! - Configuration handling
//! - The AccuWeather client (location search and daily forecast)
//! - Flattening of forecast payloads into plot-ready series
//! - Per-city dashboard aggregation and Plotly figure specs
//!
//! It is used by `cityweather-cli`, but can also be reused by other binaries or services.

pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod flatten;
pub mod model;
pub mod value;

pub use client::AccuWeatherClient;
pub use config::{ApiSettings, Config, DashboardSettings};
pub use dashboard::{CityPanel, Dashboard, build_dashboard, parse_city_list};
pub use error::{ConfigError, ForecastError};
pub use flatten::flatten;
pub use model::{FlattenedForecast, Horizon, Location, RawForecast};
