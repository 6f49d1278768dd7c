//! Deterministic providers and request helpers for router tests

#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use sentinelx::SentinelConfig;
use sentinelx::api::AppState;
use sentinelx::models::{
    CurrentConditions, ExtremeWeatherAssessment, NewsArticle, RiskLevel, SnapshotLocation,
    WeatherAlert, WeatherSnapshot,
};
use sentinelx::news::NewsProvider;
use sentinelx::safe_zones::SafeZoneStore;
use sentinelx::satellite::{
    ImageryRequest, MockSatelliteProvider, SatelliteAnalysis, SatelliteProvider,
};
use sentinelx::weather::WeatherProvider;

/// Weather provider returning fixed values; `None` fields fail
#[derive(Clone, Default)]
pub struct FixedWeather {
    pub temperature: Option<f64>,
    pub alerts: Option<Vec<WeatherAlert>>,
    pub extreme: Option<RiskLevel>,
}

impl FixedWeather {
    pub fn calm() -> Self {
        Self {
            temperature: Some(22.0),
            alerts: Some(Vec::new()),
            extreme: Some(RiskLevel::Low),
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    fn snapshot(&self, lat: f64, lng: f64) -> Result<WeatherSnapshot> {
        let temperature = self.temperature.ok_or_else(|| anyhow!("weather offline"))?;
        Ok(WeatherSnapshot {
            location: SnapshotLocation {
                lat,
                lng,
                location_name: Some("Testville".to_string()),
            },
            current: CurrentConditions {
                temperature,
                humidity: 50.0,
                pressure: 1013.0,
                wind_speed: 10.0,
                wind_direction: 180.0,
                visibility: 10.0,
                uv_index: 3.0,
                condition: "Clear".to_string(),
                icon: "01d".to_string(),
            },
            forecast: None,
        })
    }
}

#[async_trait]
impl WeatherProvider for FixedWeather {
    fn kind(&self) -> &'static str {
        "fixed"
    }

    async fn current_weather(&self, lat: f64, lng: f64) -> Result<WeatherSnapshot> {
        self.snapshot(lat, lng)
    }

    async fn forecast(&self, lat: f64, lng: f64, _days: u32) -> Result<WeatherSnapshot> {
        self.snapshot(lat, lng)
    }

    async fn alerts(&self, _lat: f64, _lng: f64) -> Result<Vec<WeatherAlert>> {
        self.alerts.clone().ok_or_else(|| anyhow!("alerts offline"))
    }

    async fn extreme_weather(&self, _lat: f64, _lng: f64) -> Result<ExtremeWeatherAssessment> {
        self.extreme
            .map(ExtremeWeatherAssessment::with_level)
            .ok_or_else(|| anyhow!("assessment offline"))
    }
}

/// News provider returning fixed feeds; `None` fields fail
#[derive(Clone, Default)]
pub struct FixedNews {
    pub general: Option<Vec<NewsArticle>>,
    pub local: Option<Vec<NewsArticle>>,
}

impl FixedNews {
    pub fn failing() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NewsProvider for FixedNews {
    fn kind(&self) -> &'static str {
        "fixed"
    }

    async fn disaster_news(&self, limit: u32) -> Result<Vec<NewsArticle>> {
        let mut articles = self.general.clone().ok_or_else(|| anyhow!("news offline"))?;
        articles.truncate(limit as usize);
        Ok(articles)
    }

    async fn search_by_location(
        &self,
        _location: &str,
        _keywords: &[String],
        limit: u32,
    ) -> Result<Vec<NewsArticle>> {
        let mut articles = self.local.clone().ok_or_else(|| anyhow!("search offline"))?;
        articles.truncate(limit as usize);
        Ok(articles)
    }
}

/// Satellite provider whose every analysis fails
pub struct OfflineSatellite;

#[async_trait]
impl SatelliteProvider for OfflineSatellite {
    fn kind(&self) -> &'static str {
        "offline"
    }

    async fn flood_risk(&self, _lat: f64, _lng: f64) -> Result<SatelliteAnalysis> {
        Err(anyhow!("flood detector offline"))
    }

    async fn fire_detection(&self, _lat: f64, _lng: f64) -> Result<SatelliteAnalysis> {
        Err(anyhow!("fire detector offline"))
    }

    async fn general_analysis(&self, _request: &ImageryRequest) -> Result<SatelliteAnalysis> {
        Err(anyhow!("imagery offline"))
    }
}

pub fn article(title: &str, url: Option<&str>, source: &str) -> NewsArticle {
    NewsArticle {
        title: title.to_string(),
        description: String::new(),
        content: String::new(),
        url: url.map(str::to_string),
        source: source.to_string(),
        author: "Desk".to_string(),
        published_at: "2024-05-01T10:00:00Z".to_string(),
        image_url: None,
        api_source: "fixed".to_string(),
        disaster_related: true,
        credibility_score: 0.8,
    }
}

pub fn app(weather: FixedWeather, news: FixedNews) -> Router {
    app_with_satellite(weather, news, Arc::new(MockSatelliteProvider::new()))
}

pub fn app_with_satellite(
    weather: FixedWeather,
    news: FixedNews,
    satellite: Arc<dyn SatelliteProvider>,
) -> Router {
    let config = SentinelConfig::default();
    let state = AppState::new(
        &config,
        Arc::new(weather),
        Arc::new(news),
        satellite,
        SafeZoneStore::with_demo_zones(),
    );
    sentinelx::web::app(state, config.server.body_limit_kb)
}

pub fn calm_app() -> Router {
    app(
        FixedWeather::calm(),
        FixedNews {
            general: Some(Vec::new()),
            local: Some(Vec::new()),
        },
    )
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub async fn send(app: Router, request: Request<Body>) -> TestResponse {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    TestResponse {
        status,
        headers,
        body,
    }
}

pub async fn get(app: Router, uri: &str) -> TestResponse {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: Router, uri: &str, body: &str) -> TestResponse {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}
