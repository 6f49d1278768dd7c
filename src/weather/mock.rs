//! Canned weather provider used when no OpenWeatherMap key is configured

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::RngExt;
use serde_json::Value;

use super::WeatherProvider;
use crate::models::{
    CurrentConditions, ForecastDay, SnapshotLocation, WeatherAlert, WeatherSnapshot,
};

const MOCK_CONDITIONS: [&str; 4] = ["Sunny", "Partly cloudy", "Cloudy", "Light rain"];

#[derive(Debug, Default, Clone)]
pub struct MockWeatherProvider;

impl MockWeatherProvider {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn random_snapshot(lat: f64, lng: f64, forecast_days: Option<u32>) -> WeatherSnapshot {
    let mut rng = rand::rng();

    let current = CurrentConditions {
        temperature: f64::from(rng.random_range(25_i32..=35)),
        humidity: f64::from(rng.random_range(60_i32..=90)),
        pressure: f64::from(rng.random_range(1003_i32..=1023)),
        wind_speed: f64::from(rng.random_range(0_i32..=20)),
        wind_direction: f64::from(rng.random_range(0_i32..360)),
        visibility: 10.0,
        uv_index: f64::from(rng.random_range(0_i32..=10)),
        condition: "Partly cloudy".to_string(),
        icon: "02d".to_string(),
    };

    let forecast = forecast_days.map(|days| {
        let today = Utc::now().date_naive();
        (0..days)
            .map(|i| ForecastDay {
                date: (today + Duration::days(i64::from(i))).to_string(),
                temperature_min: f64::from(rng.random_range(20_i32..=25)),
                temperature_max: f64::from(rng.random_range(30_i32..=40)),
                condition: MOCK_CONDITIONS[rng.random_range(0..MOCK_CONDITIONS.len())]
                    .to_string(),
                precipitation_probability: rng.random_range(0..=100),
            })
            .collect()
    });

    WeatherSnapshot {
        location: SnapshotLocation {
            lat,
            lng,
            location_name: Some("Mock Location".to_string()),
        },
        current,
        forecast,
    }
}

fn heat_wave_alert() -> WeatherAlert {
    let now = Utc::now();
    let mut alert = WeatherAlert::new(
        "Heat Wave Warning",
        "High temperatures expected for the next 3 days",
    );
    alert.severity = Some("MODERATE".to_string());
    alert
        .extra
        .insert("start_time".to_string(), Value::String(now.to_rfc3339()));
    alert.extra.insert(
        "end_time".to_string(),
        Value::String((now + Duration::days(3)).to_rfc3339()),
    );
    alert
}

#[async_trait]
impl WeatherProvider for MockWeatherProvider {
    fn kind(&self) -> &'static str {
        "mock"
    }

    async fn current_weather(&self, lat: f64, lng: f64) -> Result<WeatherSnapshot> {
        Ok(random_snapshot(lat, lng, None))
    }

    async fn forecast(&self, lat: f64, lng: f64, days: u32) -> Result<WeatherSnapshot> {
        Ok(random_snapshot(lat, lng, Some(days)))
    }

    async fn alerts(&self, _lat: f64, _lng: f64) -> Result<Vec<WeatherAlert>> {
        Ok(vec![heat_wave_alert()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RiskLevel;

    #[tokio::test]
    async fn test_mock_current_weather_in_range() {
        let provider = MockWeatherProvider::new();
        let snapshot = provider.current_weather(28.6, 77.2).await.unwrap();
        assert!((25.0..=35.0).contains(&snapshot.current.temperature));
        assert!((60.0..=90.0).contains(&snapshot.current.humidity));
        assert_eq!(snapshot.location.lat, 28.6);
        assert!(snapshot.forecast.is_none());
    }

    #[tokio::test]
    async fn test_mock_forecast_has_requested_days() {
        let provider = MockWeatherProvider::new();
        let snapshot = provider.forecast(0.0, 0.0, 5).await.unwrap();
        let forecast = snapshot.forecast.unwrap();
        assert_eq!(forecast.len(), 5);
        assert!(forecast.iter().all(|d| d.temperature_min < d.temperature_max));
    }

    #[tokio::test]
    async fn test_mock_extreme_weather_counts_alert() {
        let provider = MockWeatherProvider::new();
        let assessment = provider.extreme_weather(0.0, 0.0).await.unwrap();
        // one alert contributes 2 points and mock temperatures never exceed 35
        assert!(assessment.risk_level >= RiskLevel::Medium);
        assert_eq!(assessment.alerts, 1);
    }
}
