use axum::extract::State;
use serde::Serialize;

use super::{AppState, envelope::ApiResponse};

#[derive(Debug, Serialize)]
pub struct ProviderKinds {
    pub weather: &'static str,
    pub news: &'static str,
    pub satellite: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub providers: ProviderKinds,
}

pub async fn health(State(state): State<AppState>) -> ApiResponse<Health> {
    ApiResponse::ok(Health {
        status: "healthy",
        version: crate::VERSION,
        uptime_seconds: state.started_at.elapsed().as_secs(),
        providers: ProviderKinds {
            weather: state.weather.kind(),
            news: state.news.kind(),
            satellite: state.satellite.kind(),
        },
    })
}
