//! Disaster-intelligence aggregation
//!
//! [`IntelligenceService::gather`] is the core of the combined endpoint:
//! it runs the provider lookups through [`collector::collect`], merges and
//! deduplicates the news, scores the result with [`risk::assess_risk`] and
//! assembles a [`DisasterIntelligence`] document. Gathering never fails;
//! missing upstream data shows up as `null`/empty fields and an
//! `unavailable` entry in `data_sources`.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument};

use crate::models::{
    ExtremeWeatherAssessment, ForecastDay, LocationQuery, NewsArticle, RiskAssessment,
    WeatherAlert, WeatherSnapshot,
};
use crate::news::{NewsProvider, dedup_articles, distinct_by};
use crate::weather::WeatherProvider;

pub mod collector;
pub mod risk;
pub mod satellite;

pub use collector::{Collected, SourceStatus, collect};
pub use risk::assess_risk;
pub use satellite::SatelliteOverview;

#[derive(Debug, Clone, Serialize)]
pub struct WeatherSection {
    pub current: Option<WeatherSnapshot>,
    pub forecast: Option<Vec<ForecastDay>>,
    pub alerts: Vec<WeatherAlert>,
    pub extreme_conditions: Option<ExtremeWeatherAssessment>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewsSection {
    pub articles: Vec<NewsArticle>,
    pub total: usize,
    /// Distinct article sources in first-seen order
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct DataSources {
    pub weather: SourceStatus,
    pub news: SourceStatus,
    pub satellite: SourceStatus,
}

/// The combined disaster-intelligence document for one location
#[derive(Debug, Clone, Serialize)]
pub struct DisasterIntelligence {
    pub location: LocationQuery,
    pub weather: WeatherSection,
    pub news: NewsSection,
    pub satellite: Option<SatelliteOverview>,
    pub risk_assessment: RiskAssessment,
    pub last_updated: DateTime<Utc>,
    pub data_sources: DataSources,
}

/// General news first, then location news; deduplicated and cut to `limit`
fn merge_news(general: &[NewsArticle], local: &[NewsArticle], limit: u32) -> Vec<NewsArticle> {
    let combined = general.iter().chain(local).cloned().collect();
    let mut unique = dedup_articles(combined);
    unique.truncate(limit as usize);
    unique
}

/// Build the response document from settled lookups
#[must_use]
pub fn assemble(query: LocationQuery, collected: Collected, now: DateTime<Utc>) -> DisasterIntelligence {
    let risk_assessment = assess_risk(
        &collected.alerts,
        collected.extreme.as_ref(),
        &collected.general_news,
    );

    let articles = merge_news(
        &collected.general_news,
        &collected.location_news,
        query.news_limit,
    );
    let sources = distinct_by(&articles, |a| a.source.as_str());

    let satellite = query
        .include_satellite
        .then(|| SatelliteOverview::mock(now));

    DisasterIntelligence {
        weather: WeatherSection {
            current: collected.current_weather,
            forecast: collected.forecast,
            alerts: collected.alerts,
            extreme_conditions: collected.extreme,
        },
        news: NewsSection {
            total: articles.len(),
            articles,
            sources,
        },
        satellite,
        risk_assessment,
        last_updated: now,
        data_sources: DataSources {
            weather: collected.weather_status,
            news: collected.news_status,
            satellite: SourceStatus::Mock,
        },
        location: query,
    }
}

/// Aggregates the configured providers for the combined endpoint
#[derive(Clone)]
pub struct IntelligenceService {
    weather: Arc<dyn WeatherProvider>,
    news: Arc<dyn NewsProvider>,
    forecast_days: u32,
}

impl IntelligenceService {
    pub fn new(
        weather: Arc<dyn WeatherProvider>,
        news: Arc<dyn NewsProvider>,
        forecast_days: u32,
    ) -> Self {
        Self {
            weather,
            news,
            forecast_days,
        }
    }

    #[instrument(skip(self, query), fields(location = %query.format_coordinates()))]
    pub async fn gather(&self, query: LocationQuery) -> DisasterIntelligence {
        let start = Instant::now();
        let collected = collect(
            self.weather.as_ref(),
            self.news.as_ref(),
            &query,
            self.forecast_days,
        )
        .await;

        let intelligence = assemble(query, collected, Utc::now());
        info!(
            "Gathered intelligence in {:.2?}: risk {} ({} articles)",
            start.elapsed(),
            intelligence.risk_assessment.overall_risk,
            intelligence.news.total
        );
        intelligence
    }
}
