//! Concurrent, failure-isolated lookups for one location

use std::fmt::Display;

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::models::{
    ExtremeWeatherAssessment, ForecastDay, LocationQuery, NewsArticle, WeatherAlert,
    WeatherSnapshot,
};
use crate::news::NewsProvider;
use crate::weather::WeatherProvider;

pub const LOCATION_NEWS_LIMIT: u32 = 10;

/// Availability of one upstream source in the aggregated response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceStatus {
    Live,
    Unavailable,
    Mock,
}

impl SourceStatus {
    fn from_success(ok: bool) -> Self {
        if ok { Self::Live } else { Self::Unavailable }
    }
}

/// Everything the lookups produced; failed lookups are `None` or empty
#[derive(Debug, Clone)]
pub struct Collected {
    pub current_weather: Option<WeatherSnapshot>,
    pub forecast: Option<Vec<ForecastDay>>,
    pub alerts: Vec<WeatherAlert>,
    pub extreme: Option<ExtremeWeatherAssessment>,
    pub general_news: Vec<NewsArticle>,
    pub location_news: Vec<NewsArticle>,
    pub weather_status: SourceStatus,
    pub news_status: SourceStatus,
}

fn settle<T, E: Display>(lookup: &str, result: Result<T, E>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(lookup, "Lookup failed: {e:#}");
            None
        }
    }
}

/// Run every lookup for `query` concurrently and wait for all of them.
///
/// A failing lookup never fails the collection. `forecast_days` is only used
/// when the query asks for a forecast.
#[instrument(skip(weather, news, query), fields(lat = query.latitude, lng = query.longitude))]
pub async fn collect(
    weather: &dyn WeatherProvider,
    news: &dyn NewsProvider,
    query: &LocationQuery,
    forecast_days: u32,
) -> Collected {
    let (lat, lng) = (query.latitude, query.longitude);

    let location_news = async {
        match &query.location_name {
            Some(name) => {
                news.search_by_location(name, &[], LOCATION_NEWS_LIMIT)
                    .await
            }
            None => Ok(Vec::new()),
        }
    };

    let forecast = async {
        if query.include_forecast {
            weather
                .forecast(lat, lng, forecast_days)
                .await
                .map(|snapshot| snapshot.forecast)
        } else {
            Ok(None)
        }
    };

    let (current, alerts, extreme, general_news, location_news, forecast) = tokio::join!(
        weather.current_weather(lat, lng),
        weather.alerts(lat, lng),
        weather.extreme_weather(lat, lng),
        news.disaster_news(query.news_limit),
        location_news,
        forecast,
    );

    let current_weather = settle("current_weather", current);
    let general_news = settle("disaster_news", general_news);

    let collected = Collected {
        weather_status: SourceStatus::from_success(current_weather.is_some()),
        news_status: SourceStatus::from_success(general_news.is_some()),
        current_weather,
        forecast: settle("forecast", forecast).flatten(),
        alerts: settle("alerts", alerts).unwrap_or_default(),
        extreme: settle("extreme_weather", extreme),
        general_news: general_news.unwrap_or_default(),
        location_news: settle("location_news", location_news).unwrap_or_default(),
    };

    debug!(
        alerts = collected.alerts.len(),
        general_news = collected.general_news.len(),
        location_news = collected.location_news.len(),
        "Collected lookups"
    );
    collected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::news::MockNewsProvider;
    use crate::weather::MockWeatherProvider;
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;

    struct DownWeather;

    #[async_trait]
    impl WeatherProvider for DownWeather {
        fn kind(&self) -> &'static str {
            "down"
        }

        async fn current_weather(&self, _lat: f64, _lng: f64) -> Result<WeatherSnapshot> {
            Err(anyhow!("weather offline"))
        }

        async fn forecast(&self, _lat: f64, _lng: f64, _days: u32) -> Result<WeatherSnapshot> {
            Err(anyhow!("weather offline"))
        }

        async fn alerts(&self, _lat: f64, _lng: f64) -> Result<Vec<WeatherAlert>> {
            Err(anyhow!("weather offline"))
        }
    }

    #[tokio::test]
    async fn test_weather_failure_is_isolated() {
        let query = LocationQuery::new(28.6, 77.2);
        let collected = collect(&DownWeather, &MockNewsProvider::new(), &query, 5).await;

        assert!(collected.current_weather.is_none());
        assert!(collected.forecast.is_none());
        assert!(collected.alerts.is_empty());
        assert!(collected.extreme.is_none());
        assert_eq!(collected.weather_status, SourceStatus::Unavailable);
        assert_eq!(collected.news_status, SourceStatus::Live);
        assert_eq!(collected.general_news.len(), 3);
    }

    #[tokio::test]
    async fn test_optional_lookups_follow_query() {
        let mut query = LocationQuery::new(28.6, 77.2);
        query.include_forecast = false;
        let collected = collect(&MockWeatherProvider::new(), &MockNewsProvider::new(), &query, 5).await;
        assert!(collected.forecast.is_none());
        assert!(collected.location_news.is_empty());

        query.include_forecast = true;
        query.location_name = Some("Delhi".to_string());
        let collected = collect(&MockWeatherProvider::new(), &MockNewsProvider::new(), &query, 3).await;
        assert_eq!(collected.forecast.map(|f| f.len()), Some(3));
        assert_eq!(collected.location_news.len(), 1);
        assert_eq!(collected.weather_status, SourceStatus::Live);
    }
}
