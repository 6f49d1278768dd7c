//! OpenWeatherMap client
//!
//! Current conditions come from `/weather`, the forecast from `/forecast`
//! (3-hour steps, one entry per day is kept) and alerts from `/onecall`.
//! Requests are made once; failures are returned to the caller, which
//! decides whether to degrade.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use super::WeatherProvider;
use crate::SentinelError;
use crate::config::WeatherConfig;
use crate::models::{
    CurrentConditions, ForecastDay, SnapshotLocation, WeatherAlert, WeatherSnapshot,
};

/// Forecast entries per day at 3-hour resolution
const STEPS_PER_DAY: usize = 8;

pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(config: &WeatherConfig, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("SentinelX/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn url(&self, endpoint: &str, lat: f64, lng: f64, extra: &str) -> String {
        format!(
            "{}/{endpoint}?lat={lat}&lon={lng}&appid={}&units=metric{extra}",
            self.base_url,
            urlencoding::encode(&self.api_key)
        )
    }

    #[instrument(skip(self, url))]
    async fn make_request(&self, endpoint: &str, url: &str) -> Result<Response> {
        let start = Instant::now();
        let response = self.client.get(url).send().await.map_err(|e| {
            warn!("Network error calling OpenWeatherMap: {}", e);
            SentinelError::api(format!("Network error calling {endpoint}: {e}"))
        })?;

        let status = response.status();
        debug!(
            "OpenWeatherMap responded {} in {:.3}s",
            status,
            start.elapsed().as_secs_f64()
        );

        match status {
            s if s.is_success() => Ok(response),
            StatusCode::UNAUTHORIZED => Err(SentinelError::api(
                "Invalid API key. Please check your OpenWeatherMap API key.",
            )
            .into()),
            StatusCode::NOT_FOUND => {
                Err(SentinelError::api("Location not found by weather provider").into())
            }
            StatusCode::TOO_MANY_REQUESTS => {
                Err(SentinelError::api("Weather provider rate limit exceeded").into())
            }
            other => Err(SentinelError::api(format!(
                "Weather API error: {} - {}",
                other.as_u16(),
                other.canonical_reason().unwrap_or("Unknown error")
            ))
            .into()),
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    fn kind(&self) -> &'static str {
        "live"
    }

    #[instrument(skip(self))]
    async fn current_weather(&self, lat: f64, lng: f64) -> Result<WeatherSnapshot> {
        let url = self.url("weather", lat, lng, "");
        let response = self.make_request("weather", &url).await?;
        let body: CurrentResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse OpenWeatherMap weather response")?;

        info!("Retrieved current weather for {:.4}, {:.4}", lat, lng);
        Ok(body.into_snapshot(lat, lng))
    }

    #[instrument(skip(self))]
    async fn forecast(&self, lat: f64, lng: f64, days: u32) -> Result<WeatherSnapshot> {
        let count = days as usize * STEPS_PER_DAY;
        let url = self.url("forecast", lat, lng, &format!("&cnt={count}"));
        let response = self.make_request("forecast", &url).await?;
        let body: ForecastResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse OpenWeatherMap forecast response")?;

        let snapshot = body.into_snapshot(lat, lng, count).ok_or_else(|| {
            SentinelError::api("Forecast response contained no entries")
        })?;
        info!(
            "Retrieved {} forecast days for {:.4}, {:.4}",
            snapshot.forecast.as_ref().map_or(0, Vec::len),
            lat,
            lng
        );
        Ok(snapshot)
    }

    #[instrument(skip(self))]
    async fn alerts(&self, lat: f64, lng: f64) -> Result<Vec<WeatherAlert>> {
        let url = self.url("onecall", lat, lng, "&exclude=minutely,hourly");
        let response = self.make_request("onecall", &url).await?;
        let body: OneCallResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse OpenWeatherMap alerts response")?;

        let alerts = body.alerts.unwrap_or_default();
        debug!("{} active weather alerts", alerts.len());
        Ok(alerts)
    }
}

/// Round to whole units as the dashboard displays them
fn whole(value: f64) -> f64 {
    value.round()
}

/// m/s to km/h
fn to_kmh(speed_ms: f64) -> f64 {
    (speed_ms * 3.6).round()
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
    #[serde(default)]
    temp_min: f64,
    #[serde(default)]
    temp_max: f64,
    humidity: f64,
    pressure: f64,
}

#[derive(Debug, Deserialize, Default)]
struct WindBlock {
    #[serde(default)]
    speed: f64,
    #[serde(default)]
    deg: f64,
}

#[derive(Debug, Deserialize)]
struct ConditionBlock {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    name: Option<String>,
    main: MainBlock,
    #[serde(default)]
    wind: WindBlock,
    /// metres
    visibility: Option<f64>,
    #[serde(default)]
    weather: Vec<ConditionBlock>,
}

fn conditions(
    main: &MainBlock,
    wind: &WindBlock,
    visibility_km: f64,
    weather: &[ConditionBlock],
) -> CurrentConditions {
    let condition = weather.first();
    CurrentConditions {
        temperature: whole(main.temp),
        humidity: main.humidity,
        pressure: main.pressure,
        wind_speed: to_kmh(wind.speed),
        wind_direction: wind.deg,
        visibility: visibility_km,
        // not offered by the current-weather endpoint
        uv_index: 0.0,
        condition: condition.map_or_else(|| "Unknown".to_string(), |c| c.description.clone()),
        icon: condition.map_or_else(|| "01d".to_string(), |c| c.icon.clone()),
    }
}

impl CurrentResponse {
    fn into_snapshot(self, lat: f64, lng: f64) -> WeatherSnapshot {
        let visibility = self.visibility.map_or(10.0, |m| (m / 1000.0).round());
        WeatherSnapshot {
            current: conditions(&self.main, &self.wind, visibility, &self.weather),
            location: SnapshotLocation {
                lat,
                lng,
                location_name: self.name,
            },
            forecast: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ForecastEntry {
    dt: i64,
    main: MainBlock,
    #[serde(default)]
    wind: WindBlock,
    #[serde(default)]
    weather: Vec<ConditionBlock>,
    /// probability of precipitation, 0..1
    #[serde(default)]
    pop: f64,
}

#[derive(Debug, Deserialize)]
struct CityBlock {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    list: Vec<ForecastEntry>,
    city: Option<CityBlock>,
}

impl ForecastResponse {
    fn into_snapshot(self, lat: f64, lng: f64, max_entries: usize) -> Option<WeatherSnapshot> {
        let first = self.list.first()?;
        let current = conditions(&first.main, &first.wind, 10.0, &first.weather);

        let forecast = self
            .list
            .iter()
            .take(max_entries)
            .step_by(STEPS_PER_DAY)
            .map(|entry| ForecastDay {
                date: DateTime::from_timestamp(entry.dt, 0)
                    .map(|dt| dt.date_naive().to_string())
                    .unwrap_or_default(),
                temperature_min: whole(entry.main.temp_min),
                temperature_max: whole(entry.main.temp_max),
                condition: entry
                    .weather
                    .first()
                    .map_or_else(|| "Unknown".to_string(), |c| c.description.clone()),
                precipitation_probability: (entry.pop.clamp(0.0, 1.0) * 100.0).round() as u8,
            })
            .collect();

        Some(WeatherSnapshot {
            location: SnapshotLocation {
                lat,
                lng,
                location_name: self.city.and_then(|c| c.name),
            },
            current,
            forecast: Some(forecast),
        })
    }
}

#[derive(Debug, Deserialize)]
struct OneCallResponse {
    alerts: Option<Vec<WeatherAlert>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, routing::get};
    use rstest::rstest;
    use serde_json::{Value, json};

    /// A client whose `/weather` endpoint answers with `status` and `body`
    async fn stub_client(status: StatusCode, body: Value) -> OpenWeatherClient {
        let router = Router::new().route(
            "/weather",
            get(move || {
                let body = body.clone();
                async move { (status, Json(body)) }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });

        let config = WeatherConfig {
            base_url: format!("http://{addr}"),
            ..WeatherConfig::default()
        };
        OpenWeatherClient::new(&config, "key".to_string()).unwrap()
    }

    #[rstest]
    #[case(
        StatusCode::UNAUTHORIZED,
        "Invalid API key. Please check your OpenWeatherMap API key."
    )]
    #[case(StatusCode::NOT_FOUND, "Location not found by weather provider")]
    #[case(StatusCode::TOO_MANY_REQUESTS, "Weather provider rate limit exceeded")]
    #[case(
        StatusCode::SERVICE_UNAVAILABLE,
        "Weather API error: 503 - Service Unavailable"
    )]
    #[tokio::test]
    async fn test_error_status_mapping(#[case] status: StatusCode, #[case] expected: &str) {
        let client = stub_client(status, json!({"cod": status.as_u16()})).await;

        let err = client.current_weather(1.0, 2.0).await.unwrap_err();
        match err.downcast_ref::<SentinelError>() {
            Some(SentinelError::Api { message }) => assert_eq!(message, expected),
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_current_weather_over_http() {
        let client = stub_client(
            StatusCode::OK,
            json!({
                "name": "Pune",
                "main": {"temp": 27.2, "humidity": 64, "pressure": 1008},
                "wind": {"speed": 2.5, "deg": 90},
                "weather": [{"description": "scattered clouds", "icon": "03d"}]
            }),
        )
        .await;

        let snapshot = client.current_weather(18.52, 73.86).await.unwrap();
        assert_eq!(snapshot.location.location_name.as_deref(), Some("Pune"));
        assert_eq!(snapshot.current.temperature, 27.0);
        assert_eq!(snapshot.current.wind_speed, 9.0);
        assert_eq!(snapshot.current.condition, "scattered clouds");
    }

    #[test]
    fn test_current_response_conversion() {
        let body: CurrentResponse = serde_json::from_value(json!({
            "name": "New Delhi",
            "main": {"temp": 31.6, "humidity": 70, "pressure": 1002},
            "wind": {"speed": 5.0, "deg": 270},
            "visibility": 4500,
            "weather": [{"description": "haze", "icon": "50d"}]
        }))
        .unwrap();

        let snapshot = body.into_snapshot(28.61, 77.21);
        assert_eq!(snapshot.location.location_name.as_deref(), Some("New Delhi"));
        assert_eq!(snapshot.current.temperature, 32.0);
        assert_eq!(snapshot.current.wind_speed, 18.0);
        assert_eq!(snapshot.current.visibility, 5.0);
        assert_eq!(snapshot.current.condition, "haze");
        assert!(snapshot.forecast.is_none());
    }

    #[test]
    fn test_current_response_defaults() {
        let body: CurrentResponse = serde_json::from_value(json!({
            "main": {"temp": 10.0, "humidity": 40, "pressure": 1010}
        }))
        .unwrap();
        let snapshot = body.into_snapshot(0.0, 0.0);
        assert_eq!(snapshot.current.visibility, 10.0);
        assert_eq!(snapshot.current.condition, "Unknown");
        assert_eq!(snapshot.current.icon, "01d");
    }

    #[test]
    fn test_forecast_keeps_one_entry_per_day() {
        let entries: Vec<_> = (0..16)
            .map(|i| {
                json!({
                    "dt": 1_704_067_200 + i * 3 * 3600,
                    "main": {"temp": 20.0, "temp_min": 18.4, "temp_max": 24.6, "humidity": 50, "pressure": 1012},
                    "weather": [{"description": "light rain", "icon": "10d"}],
                    "pop": 0.35
                })
            })
            .collect();
        let body: ForecastResponse = serde_json::from_value(json!({
            "list": entries,
            "city": {"name": "Delhi"}
        }))
        .unwrap();

        let snapshot = body.into_snapshot(0.0, 0.0, 16).unwrap();
        let forecast = snapshot.forecast.unwrap();
        assert_eq!(forecast.len(), 2);
        assert_eq!(forecast[0].date, "2024-01-01");
        assert_eq!(forecast[1].date, "2024-01-02");
        assert_eq!(forecast[0].temperature_min, 18.0);
        assert_eq!(forecast[0].temperature_max, 25.0);
        assert_eq!(forecast[0].precipitation_probability, 35);
    }

    #[test]
    fn test_empty_forecast_is_none() {
        let body: ForecastResponse =
            serde_json::from_value(json!({"list": [], "city": null})).unwrap();
        assert!(body.into_snapshot(0.0, 0.0, 40).is_none());
    }

    #[test]
    fn test_url_includes_key_and_units() {
        let client =
            OpenWeatherClient::new(&WeatherConfig::default(), "k&y".to_string()).unwrap();
        let url = client.url("weather", 1.5, 2.5, "");
        assert_eq!(
            url,
            "https://api.openweathermap.org/data/2.5/weather?lat=1.5&lon=2.5&appid=k%26y&units=metric"
        );
    }
}
