//! Per-city aggregation for the dashboard, plus the Plotly figure specs it renders.
//!
//! Cities are processed one after another, in the order given. A failure for one
//! city is recorded as a [`CityPanel::Failed`] and never stops the others.

use serde::Serialize;
use tracing::warn;

use crate::{
    client::AccuWeatherClient,
    error::ForecastError,
    flatten::flatten,
    model::{FlattenedForecast, Location},
};

/// Everything the dashboard needs to draw one request.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub days: u32,
    /// Combined map of every city that resolved; absent when none did.
    pub map: Option<MapFigure>,
    pub locations: Vec<Location>,
    pub panels: Vec<CityPanel>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CityPanel {
    Ready {
        city: String,
        forecast: FlattenedForecast,
        chart: ChartFigure,
    },
    Failed {
        city: String,
        message: String,
    },
}

impl CityPanel {
    pub fn city(&self) -> &str {
        match self {
            CityPanel::Ready { city, .. } | CityPanel::Failed { city, .. } => city,
        }
    }
}

/// Split a comma-separated city list, trimming blanks and keeping order.
pub fn parse_city_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

/// Run resolve, fetch, and flatten for each city and assemble the figures.
///
/// A city is placed on the map as soon as it resolves, even if its forecast
/// fetch fails afterwards.
pub async fn build_dashboard(
    client: &AccuWeatherClient,
    cities: &[String],
    days: u32,
) -> Dashboard {
    let mut locations = Vec::new();
    let mut panels = Vec::with_capacity(cities.len());

    for city in cities {
        let panel = match city_forecast(client, city, days, &mut locations).await {
            Ok(forecast) => CityPanel::Ready {
                city: city.clone(),
                chart: chart_figure(city, &forecast),
                forecast,
            },
            Err(e) => {
                warn!(city = %city, error = %e, "city skipped");
                CityPanel::Failed {
                    city: city.clone(),
                    message: format!("Error while processing {city}: {e}"),
                }
            }
        };
        panels.push(panel);
    }

    let map = (!locations.is_empty()).then(|| map_figure(&locations));

    Dashboard {
        days,
        map,
        locations,
        panels,
    }
}

async fn city_forecast(
    client: &AccuWeatherClient,
    city: &str,
    days: u32,
    locations: &mut Vec<Location>,
) -> Result<FlattenedForecast, ForecastError> {
    let location = client.resolve_location(city).await?;
    let key = location.key.clone();
    locations.push(location);

    let raw = client.fetch_forecast(&key, days).await?;
    Ok(flatten(&raw))
}

// Plotly figure specs. Field names follow plotly.js so the browser can pass
// them straight to `Plotly.newPlot`.

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Figure<L> {
    pub data: Vec<Trace>,
    pub layout: L,
}

pub type ChartFigure = Figure<ChartLayout>;
pub type MapFigure = Figure<MapLayout>;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Scatter {
        x: Vec<String>,
        y: Vec<f64>,
        mode: &'static str,
        name: &'static str,
    },
    Bar {
        x: Vec<String>,
        y: Vec<f64>,
        name: &'static str,
        yaxis: &'static str,
    },
    Scattermapbox {
        lat: Vec<f64>,
        lon: Vec<f64>,
        mode: &'static str,
        marker: Marker,
        text: Vec<String>,
        hoverinfo: &'static str,
    },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Marker {
    pub size: u32,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Title {
    pub text: String,
}

impl Title {
    fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Axis {
    pub title: Title,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlaying: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<&'static str>,
}

impl Axis {
    fn titled(text: &str) -> Self {
        Self {
            title: Title::new(text),
            overlaying: None,
            side: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Legend {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartLayout {
    pub title: Title,
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub yaxis2: Axis,
    pub legend: Legend,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Mapbox {
    pub style: &'static str,
    pub zoom: f64,
    pub center: LatLon,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Margin {
    pub r: u32,
    pub t: u32,
    pub l: u32,
    pub b: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MapLayout {
    pub mapbox: Mapbox,
    pub margin: Margin,
    pub height: u32,
}

/// Min/max temperature lines with wind speed bars on a secondary axis.
pub fn chart_figure(city: &str, forecast: &FlattenedForecast) -> ChartFigure {
    let line = |y: &[f64], name| Trace::Scatter {
        x: forecast.dates.clone(),
        y: y.to_vec(),
        mode: "lines+markers",
        name,
    };

    Figure {
        data: vec![
            line(&forecast.min_temps, "Min Temp (°C)"),
            line(&forecast.max_temps, "Max Temp (°C)"),
            Trace::Bar {
                x: forecast.dates.clone(),
                y: forecast.wind_speeds.clone(),
                name: "Wind Speed",
                yaxis: "y2",
            },
        ],
        layout: ChartLayout {
            title: Title::new(format!("Forecast: {city}")),
            xaxis: Axis::titled("Date"),
            yaxis: Axis::titled("Temperature (°C)"),
            yaxis2: Axis {
                title: Title::new("Wind Speed"),
                overlaying: Some("y"),
                side: Some("right"),
            },
            legend: Legend { x: 0.0, y: 1.2 },
        },
    }
}

/// One red marker per location on an OpenStreetMap base layer.
pub fn map_figure(locations: &[Location]) -> MapFigure {
    Figure {
        data: vec![Trace::Scattermapbox {
            lat: locations.iter().map(|l| l.lat).collect(),
            lon: locations.iter().map(|l| l.lon).collect(),
            mode: "markers",
            marker: Marker {
                size: 12,
                color: "red",
            },
            text: locations.iter().map(|l| l.name.clone()).collect(),
            hoverinfo: "text",
        }],
        layout: MapLayout {
            mapbox: Mapbox {
                style: "open-street-map",
                zoom: 2.0,
                center: LatLon {
                    lat: 50.0,
                    lon: 10.0,
                },
            },
            margin: Margin {
                r: 0,
                t: 0,
                l: 0,
                b: 0,
            },
            height: 500,
        },
    }
}
