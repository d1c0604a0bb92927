use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{debug, info};

use crate::{
    config::ApiSettings,
    error::ForecastError,
    flatten::DAILY_FORECASTS,
    model::{Horizon, Location, RawForecast},
    value::ValueExt,
};

/// Thin client over the AccuWeather location search and daily forecast endpoints.
///
/// Each call is a single GET bounded by the configured timeout. There are no
/// retries and nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct AccuWeatherClient {
    api_key: String,
    base_url: Url,
    language: String,
    http: Client,
}

impl AccuWeatherClient {
    pub fn new(api_key: impl Into<String>, settings: &ApiSettings) -> Result<Self, ForecastError> {
        let base_url = Url::parse(&settings.base_url).map_err(|e| {
            ForecastError::InvalidParameter(format!("invalid base URL '{}': {e}", settings.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ForecastError::InvalidParameter(format!(
                "base URL '{}' cannot carry a path",
                settings.base_url
            )));
        }

        let http = Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| ForecastError::transport("building the HTTP client", e))?;

        Ok(Self {
            api_key: api_key.into(),
            base_url,
            language: settings.language.clone(),
            http,
        })
    }

    /// Resolve a free-text city name to the first match of the location search.
    ///
    /// The returned [`Location`] keeps `city` as its name. Coordinates the API
    /// omits default to `0.0`.
    pub async fn resolve_location(&self, city: &str) -> Result<Location, ForecastError> {
        if city.trim().is_empty() {
            return Err(ForecastError::InvalidParameter(
                "city name must not be empty".into(),
            ));
        }

        let url = self.endpoint(&["locations", "v1", "cities", "search"]);
        debug!(city, path = url.path(), "searching location");

        let body = self
            .get_json(
                url,
                &[
                    ("apikey", self.api_key.as_str()),
                    ("q", city),
                    ("language", self.language.as_str()),
                ],
                "location search",
            )
            .await?;

        let results = body.as_array().ok_or_else(|| {
            ForecastError::malformed("location search", "expected a JSON array of locations")
        })?;
        let first = results.first().ok_or_else(|| ForecastError::NotFound {
            city: city.to_string(),
        })?;
        if !first.is_object() {
            return Err(ForecastError::malformed(
                "location search",
                "first result is not an object",
            ));
        }

        let location = Location {
            key: first.get_str_or(&["Key"], "").to_string(),
            name: city.to_string(),
            lat: first.get_or(&["GeoPosition", "Latitude"], 0.0),
            lon: first.get_or(&["GeoPosition", "Longitude"], 0.0),
        };

        info!(
            city,
            key = %location.key,
            lat = location.lat,
            lon = location.lon,
            "resolved location"
        );
        Ok(location)
    }

    /// Fetch the daily forecast for `location_key`, keeping only the first `days` entries.
    ///
    /// `days` must be 1, 3 or 5; anything else fails before a request is sent.
    /// A payload without a `DailyForecasts` list is returned untouched.
    pub async fn fetch_forecast(
        &self,
        location_key: &str,
        days: u32,
    ) -> Result<RawForecast, ForecastError> {
        let horizon = Horizon::try_from(days)?;
        if location_key.is_empty() {
            return Err(ForecastError::InvalidParameter(
                "location key must not be empty".into(),
            ));
        }

        let url = self.endpoint(&["forecasts", "v1", "daily", "5day", location_key]);
        debug!(location_key, days, path = url.path(), "fetching daily forecast");

        let mut body = self
            .get_json(
                url,
                &[
                    ("apikey", self.api_key.as_str()),
                    ("language", self.language.as_str()),
                    ("metric", "true"),
                ],
                "daily forecast",
            )
            .await?;

        truncate_daily(&mut body, horizon);
        Ok(body)
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json(
        &self,
        url: Url,
        query: &[(&str, &str)],
        what: &str,
    ) -> Result<Value, ForecastError> {
        let res = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                ForecastError::transport(
                    &format!("sending {what} request"),
                    error_chain(&e.without_url()),
                )
            })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| {
                ForecastError::transport(
                    &format!("reading {what} response"),
                    error_chain(&e.without_url()),
                )
            })?;

        if !status.is_success() {
            return Err(ForecastError::transport(
                &format!("requesting {what}"),
                format!("status {status}: {}", truncate_body(&body)),
            ));
        }

        serde_json::from_str(&body).map_err(|e| ForecastError::malformed(what, e))
    }
}

/// Keep the first `horizon` daily entries; leaves the payload alone if the list is absent.
pub(crate) fn truncate_daily(payload: &mut RawForecast, horizon: Horizon) {
    if let Some(list) = payload
        .get_mut(DAILY_FORECASTS)
        .and_then(Value::as_array_mut)
    {
        list.truncate(horizon.days() as usize);
    }
}

/// `top: cause: root cause`, so a timeout can be told apart from a refused connection.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !msg.ends_with(&text) {
            msg.push_str(": ");
            msg.push_str(&text);
        }
        source = cause.source();
    }
    msg
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
