use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use sentinelx::api::AppState;
use sentinelx::config::SentinelConfig;
use sentinelx::news::{LiveNewsProvider, MockNewsProvider, NewsProvider};
use sentinelx::safe_zones::SafeZoneStore;
use sentinelx::satellite::MockSatelliteProvider;
use sentinelx::weather::{MockWeatherProvider, OpenWeatherClient, WeatherProvider};
use sentinelx::{logging, web};

fn weather_provider(config: &SentinelConfig) -> Result<Arc<dyn WeatherProvider>> {
    match &config.weather.api_key {
        Some(key) => Ok(Arc::new(OpenWeatherClient::new(&config.weather, key.clone())?)),
        None => {
            warn!("No OpenWeatherMap API key configured, serving mock weather data");
            Ok(Arc::new(MockWeatherProvider::new()))
        }
    }
}

fn news_provider(config: &SentinelConfig) -> Result<Arc<dyn NewsProvider>> {
    match LiveNewsProvider::from_config(&config.news)? {
        Some(provider) => Ok(Arc::new(provider)),
        None => {
            warn!("No news API key configured, serving mock news data");
            Ok(Arc::new(MockNewsProvider::new()))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = SentinelConfig::load()?;
    logging::init(&config.logging)?;

    let weather = weather_provider(&config)?;
    let news = news_provider(&config)?;
    info!(
        weather = weather.kind(),
        news = news.kind(),
        "SentinelX {} starting",
        sentinelx::VERSION
    );

    let state = AppState::new(
        &config,
        weather,
        news,
        Arc::new(MockSatelliteProvider::new()),
        SafeZoneStore::with_demo_zones(),
    );
    web::run(&config, state).await
}
