use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ForecastError;

/// Forecast payload as returned by the daily forecast endpoint, truncated to the
/// requested horizon. Kept loosely typed; see [`crate::flatten`].
pub type RawForecast = serde_json::Value;

/// A city resolved through the location search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Opaque location key issued by the weather API.
    pub key: String,
    /// The name as the user typed it, not the API's canonical name.
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// Number of forecast days a caller may ask for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Horizon {
    One,
    #[default]
    Three,
    Five,
}

impl Horizon {
    pub const fn days(self) -> u32 {
        match self {
            Horizon::One => 1,
            Horizon::Three => 3,
            Horizon::Five => 5,
        }
    }

    pub const fn all() -> &'static [Horizon] {
        &[Horizon::One, Horizon::Three, Horizon::Five]
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.days())
    }
}

impl TryFrom<u32> for Horizon {
    type Error = ForecastError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Horizon::One),
            3 => Ok(Horizon::Three),
            5 => Ok(Horizon::Five),
            other => Err(ForecastError::InvalidParameter(format!(
                "forecast horizon must be 1, 3 or 5 days, got {other}"
            ))),
        }
    }
}

impl From<Horizon> for u32 {
    fn from(h: Horizon) -> Self {
        h.days()
    }
}

/// Per-day forecast values as parallel, co-indexed series.
///
/// Every series always has the same length: one element per daily entry in the
/// payload it was built from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlattenedForecast {
    pub dates: Vec<String>,
    pub min_temps: Vec<f64>,
    pub max_temps: Vec<f64>,
    pub wind_speeds: Vec<f64>,
    pub precipitation_prob: Vec<f64>,
}

impl FlattenedForecast {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub(crate) fn push_day(
        &mut self,
        date: String,
        min_temp: f64,
        max_temp: f64,
        wind_speed: f64,
        precipitation: f64,
    ) {
        self.dates.push(date);
        self.min_temps.push(min_temp);
        self.max_temps.push(max_temp);
        self.wind_speeds.push(wind_speed);
        self.precipitation_prob.push(precipitation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizon_accepts_allowed_day_counts() {
        for h in Horizon::all() {
            let parsed = Horizon::try_from(h.days()).expect("allowed horizon");
            assert_eq!(*h, parsed);
        }
    }

    #[test]
    fn horizon_rejects_other_day_counts() {
        for days in [0, 2, 4, 6, 10] {
            let err = Horizon::try_from(days).unwrap_err();
            assert!(matches!(err, ForecastError::InvalidParameter(_)));
            assert!(err.to_string().contains("1, 3 or 5"));
        }
    }

    #[test]
    fn horizon_deserializes_from_number() {
        let h: Horizon = serde_json::from_str("5").expect("valid horizon");
        assert_eq!(h, Horizon::Five);
        assert!(serde_json::from_str::<Horizon>("2").is_err());
        assert_eq!(serde_json::to_string(&Horizon::One).unwrap(), "1");
    }

    #[test]
    fn push_day_keeps_series_aligned() {
        let mut f = FlattenedForecast::default();
        assert!(f.is_empty());
        f.push_day("2024-05-01".into(), 1.0, 2.0, 3.0, 4.0);
        f.push_day(String::new(), 0.0, 0.0, 0.0, 0.0);
        assert_eq!(f.len(), 2);
        assert_eq!(f.min_temps.len(), 2);
        assert_eq!(f.precipitation_prob, vec![4.0, 0.0]);
    }
}
