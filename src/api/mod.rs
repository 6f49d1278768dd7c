use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    routing::{get, post},
};

use crate::config::SentinelConfig;
use crate::intelligence::IntelligenceService;
use crate::news::NewsProvider;
use crate::safe_zones::SafeZoneStore;
use crate::satellite::SatelliteProvider;
use crate::weather::WeatherProvider;

pub mod envelope;
mod health;
mod intelligence;
mod news;
mod safe_zones;
mod satellite;
mod weather;

pub use envelope::ApiResponse;

/// Shared handler state, built once at startup
#[derive(Clone)]
pub struct AppState {
    pub weather: Arc<dyn WeatherProvider>,
    pub news: Arc<dyn NewsProvider>,
    pub satellite: Arc<dyn SatelliteProvider>,
    pub intelligence: IntelligenceService,
    pub safe_zones: Arc<SafeZoneStore>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(
        config: &SentinelConfig,
        weather: Arc<dyn WeatherProvider>,
        news: Arc<dyn NewsProvider>,
        satellite: Arc<dyn SatelliteProvider>,
        safe_zones: SafeZoneStore,
    ) -> Self {
        Self {
            intelligence: IntelligenceService::new(
                weather.clone(),
                news.clone(),
                config.weather.forecast_days,
            ),
            weather,
            news,
            satellite,
            safe_zones: Arc::new(safe_zones),
            started_at: Instant::now(),
        }
    }
}

/// Routes below `/api`. CORS preflight is answered by the layer in
/// [`crate::web::app`].
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/live/combined/disaster-intelligence",
            get(intelligence::get_intelligence).post(intelligence::post_intelligence),
        )
        .route("/live/weather/current", post(weather::current_weather))
        .route(
            "/live/satellite/disaster-imagery",
            get(satellite::get_imagery).post(satellite::post_imagery),
        )
        .route("/live/news/disaster-feed", get(news::disaster_feed))
        .route("/navigation/safezones", get(safe_zones::safe_zones))
        .route("/health", get(health::health))
        .with_state(state)
}
