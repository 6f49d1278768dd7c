use axum::{body::Bytes, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::instrument;

use super::{AppState, envelope::ApiResponse};
use crate::SentinelError;
use crate::models::{Coordinates, ExtremeWeatherAssessment, WeatherAlert, WeatherSnapshot};
use crate::validation::{FieldValidator, RawInput};

#[derive(Debug, Serialize)]
pub struct CurrentWeatherReport {
    pub weather: WeatherSnapshot,
    pub alerts: Vec<WeatherAlert>,
    pub extreme_weather: ExtremeWeatherAssessment,
    pub coordinates: Coordinates,
    pub location_name: Option<String>,
    pub last_updated: DateTime<Utc>,
}

/// Current conditions, alerts and extreme-weather assessment for a point.
/// Any provider failure fails the request.
#[instrument(skip_all)]
pub async fn current_weather(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<ApiResponse<CurrentWeatherReport>, SentinelError> {
    let input = RawInput::from_json_bytes(&body)?;
    let mut fields = FieldValidator::new(&input);
    let lat = fields.required_f64("lat", -90.0..=90.0);
    let lng = fields.required_f64("lng", -180.0..=180.0);
    let location_name = fields.optional_string("location_name");
    let coordinates = fields.finish(Coordinates { lat, lng })?;

    let fetch = async {
        let weather = state.weather.current_weather(lat, lng).await?;
        let alerts = state.weather.alerts(lat, lng).await?;
        let extreme_weather = state.weather.extreme_weather(lat, lng).await?;
        anyhow::Ok(CurrentWeatherReport {
            weather,
            alerts,
            extreme_weather,
            coordinates,
            location_name,
            last_updated: Utc::now(),
        })
    };

    let report = fetch.await.map_err(|e| {
        tracing::error!("Weather lookup failed: {e:#}");
        SentinelError::internal("Failed to fetch weather data")
    })?;
    Ok(ApiResponse::ok(report))
}
