//! Weather providers
//!
//! [`WeatherProvider`] is the seam between the handlers and the weather
//! data source. Two implementations exist: [`OpenWeatherClient`] talks to
//! OpenWeatherMap, [`MockWeatherProvider`] produces plausible canned data
//! when no API key is configured. The variant is picked once at startup.

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{
    ExtremeWeatherAssessment, RiskLevel, WeatherAlert, WeatherSnapshot,
};

pub mod mock;
pub mod openweather;

pub use mock::MockWeatherProvider;
pub use openweather::OpenWeatherClient;

const EXTREME_HEAT_CELSIUS: f64 = 40.0;
const FREEZING_CELSIUS: f64 = 0.0;
const HIGH_WIND_KMH: f64 = 50.0;
const HIGH_HUMIDITY_PERCENT: f64 = 90.0;

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Short label reported by the health endpoint ("live" or "mock")
    fn kind(&self) -> &'static str;

    async fn current_weather(&self, lat: f64, lng: f64) -> Result<WeatherSnapshot>;

    /// Snapshot whose `forecast` holds one entry per day
    async fn forecast(&self, lat: f64, lng: f64, days: u32) -> Result<WeatherSnapshot>;

    async fn alerts(&self, lat: f64, lng: f64) -> Result<Vec<WeatherAlert>>;

    /// Fetches current conditions and alerts together and assesses them
    async fn extreme_weather(&self, lat: f64, lng: f64) -> Result<ExtremeWeatherAssessment> {
        let (weather, alerts) =
            futures::try_join!(self.current_weather(lat, lng), self.alerts(lat, lng))?;
        Ok(assess_extreme_weather(&weather, &alerts))
    }
}

/// Score current conditions and alert count into an extreme-weather level
#[must_use]
pub fn assess_extreme_weather(
    weather: &WeatherSnapshot,
    alerts: &[WeatherAlert],
) -> ExtremeWeatherAssessment {
    let current = &weather.current;
    let mut score = 0usize;
    let mut conditions = Vec::new();
    let mut recommendations = Vec::new();

    if current.temperature > EXTREME_HEAT_CELSIUS {
        score += 3;
        conditions.push("Extreme heat".to_string());
        recommendations.push("Stay indoors, stay hydrated".to_string());
    } else if current.temperature < FREEZING_CELSIUS {
        score += 2;
        conditions.push("Freezing temperatures".to_string());
        recommendations.push("Dress warmly, avoid prolonged outdoor exposure".to_string());
    }

    if current.wind_speed > HIGH_WIND_KMH {
        score += 3;
        conditions.push("High winds".to_string());
        recommendations.push("Avoid outdoor activities, secure loose objects".to_string());
    }

    if current.humidity > HIGH_HUMIDITY_PERCENT {
        score += 1;
        conditions.push("High humidity".to_string());
        recommendations.push("Stay cool and hydrated".to_string());
    }

    score += alerts.len() * 2;

    let risk_level = match score {
        6.. => RiskLevel::Critical,
        4..=5 => RiskLevel::High,
        2..=3 => RiskLevel::Medium,
        _ => RiskLevel::Low,
    };

    if conditions.is_empty() {
        conditions.push("Normal weather conditions".to_string());
        recommendations.push("No special precautions needed".to_string());
    }

    ExtremeWeatherAssessment {
        risk_level,
        conditions,
        recommendations,
        alerts: alerts.len(),
        temperature_risk: current.temperature > EXTREME_HEAT_CELSIUS
            || current.temperature < FREEZING_CELSIUS,
        wind_risk: current.wind_speed > HIGH_WIND_KMH,
        humidity_risk: current.humidity > HIGH_HUMIDITY_PERCENT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CurrentConditions, SnapshotLocation};

    fn snapshot(temperature: f64, wind_speed: f64, humidity: f64) -> WeatherSnapshot {
        WeatherSnapshot {
            location: SnapshotLocation {
                lat: 0.0,
                lng: 0.0,
                location_name: None,
            },
            current: CurrentConditions {
                temperature,
                humidity,
                pressure: 1013.0,
                wind_speed,
                wind_direction: 0.0,
                visibility: 10.0,
                uv_index: 0.0,
                condition: "clear sky".to_string(),
                icon: "01d".to_string(),
            },
            forecast: None,
        }
    }

    #[test]
    fn test_normal_conditions_are_low() {
        let assessment = assess_extreme_weather(&snapshot(25.0, 10.0, 50.0), &[]);
        assert_eq!(assessment.risk_level, RiskLevel::Low);
        assert_eq!(assessment.conditions, vec!["Normal weather conditions"]);
        assert_eq!(
            assessment.recommendations,
            vec!["No special precautions needed"]
        );
        assert!(!assessment.temperature_risk);
    }

    #[test]
    fn test_heat_and_wind_are_critical() {
        let assessment = assess_extreme_weather(&snapshot(45.0, 60.0, 50.0), &[]);
        assert_eq!(assessment.risk_level, RiskLevel::Critical);
        assert_eq!(assessment.conditions, vec!["Extreme heat", "High winds"]);
        assert!(assessment.temperature_risk);
        assert!(assessment.wind_risk);
    }

    #[test]
    fn test_alerts_raise_level() {
        let alerts = vec![WeatherAlert::new("Flood Watch", "Rivers rising")];
        let assessment = assess_extreme_weather(&snapshot(-5.0, 0.0, 95.0), &alerts);
        // freezing 2 + humidity 1 + one alert 2
        assert_eq!(assessment.risk_level, RiskLevel::High);
        assert_eq!(assessment.alerts, 1);
        assert!(assessment.humidity_risk);
    }
}
