//! Reshape a daily forecast payload into plot-ready parallel series.

use serde_json::Value;

use crate::{
    model::{FlattenedForecast, RawForecast},
    value::ValueExt,
};

/// Field holding the list of daily entries in a forecast payload.
pub const DAILY_FORECASTS: &str = "DailyForecasts";

const DATE: &[&str] = &["Date"];
const MIN_TEMP: &[&str] = &["Temperature", "Minimum", "Value"];
const MAX_TEMP: &[&str] = &["Temperature", "Maximum", "Value"];
const WIND_SPEED: &[&str] = &["Day", "Wind", "Speed", "Value"];
const PRECIPITATION: &[&str] = &["Day", "PrecipitationProbability"];

/// Flatten every daily entry of `payload`, in order.
///
/// Never fails: a missing `DailyForecasts` list yields empty series, and any
/// field missing inside an entry becomes `""` (date) or `0.0` (numbers).
pub fn flatten(payload: &RawForecast) -> FlattenedForecast {
    let days = payload
        .get(DAILY_FORECASTS)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut out = FlattenedForecast::default();
    for day in days {
        out.push_day(
            calendar_day(day.get_str_or(DATE, "")).to_string(),
            day.get_or(MIN_TEMP, 0.0),
            day.get_or(MAX_TEMP, 0.0),
            day.get_or(WIND_SPEED, 0.0),
            day.get_or(PRECIPITATION, 0.0),
        );
    }
    out
}

/// `2024-05-01T07:00:00+03:00` -> `2024-05-01`.
fn calendar_day(date: &str) -> &str {
    date.split_once('T').map_or(date, |(day, _)| day)
}
