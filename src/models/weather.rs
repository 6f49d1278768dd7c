//! Weather models shared by the live and mock weather providers

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::risk::RiskLevel;

/// Current conditions, plus an optional multi-day forecast, for one point
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub location: SnapshotLocation,
    pub current: CurrentConditions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecast: Option<Vec<ForecastDay>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SnapshotLocation {
    pub lat: f64,
    pub lng: f64,
    pub location_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CurrentConditions {
    /// Temperature in Celsius
    pub temperature: f64,
    /// Relative humidity in percent
    pub humidity: f64,
    /// Atmospheric pressure in hPa
    pub pressure: f64,
    /// Wind speed in km/h
    pub wind_speed: f64,
    /// Wind direction in degrees
    pub wind_direction: f64,
    /// Visibility in km
    pub visibility: f64,
    pub uv_index: f64,
    /// Human-readable condition, e.g. "light rain"
    pub condition: String,
    pub icon: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastDay {
    /// ISO date (YYYY-MM-DD)
    pub date: String,
    pub temperature_min: f64,
    pub temperature_max: f64,
    pub condition: String,
    /// Probability of precipitation in percent
    pub precipitation_probability: u8,
}

/// A provider-issued weather alert. Known fields are typed, everything else
/// the provider sends is kept as-is so the alert round-trips unmodified.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct WeatherAlert {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WeatherAlert {
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
            ..Self::default()
        }
    }
}

/// Extreme-weather assessment derived from current conditions and alerts
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ExtremeWeatherAssessment {
    pub risk_level: RiskLevel,
    pub conditions: Vec<String>,
    pub recommendations: Vec<String>,
    /// Number of active alerts considered
    #[serde(default)]
    pub alerts: usize,
    #[serde(default)]
    pub temperature_risk: bool,
    #[serde(default)]
    pub wind_risk: bool,
    #[serde(default)]
    pub humidity_risk: bool,
}

impl ExtremeWeatherAssessment {
    /// Assessment carrying only a level, used by tests and fakes
    #[must_use]
    pub fn with_level(risk_level: RiskLevel) -> Self {
        Self {
            risk_level,
            conditions: Vec::new(),
            recommendations: Vec::new(),
            alerts: 0,
            temperature_risk: false,
            wind_risk: false,
            humidity_risk: false,
        }
    }
}
