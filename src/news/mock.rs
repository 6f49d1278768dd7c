//! Canned news provider used when no news API key is configured

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};

use super::NewsProvider;
use crate::models::NewsArticle;

#[derive(Debug, Default, Clone)]
pub struct MockNewsProvider;

impl MockNewsProvider {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn mock_article(
    title: &str,
    description: &str,
    slug: &str,
    source: &str,
    author: &str,
    hours_ago: i64,
    credibility_score: f64,
) -> NewsArticle {
    NewsArticle {
        title: title.to_string(),
        description: description.to_string(),
        content: format!("Detailed content about {}...", title.to_lowercase()),
        url: Some(format!("https://example.com/{slug}")),
        source: source.to_string(),
        author: author.to_string(),
        published_at: (Utc::now() - Duration::hours(hours_ago)).to_rfc3339(),
        image_url: None,
        api_source: "mock".to_string(),
        disaster_related: true,
        credibility_score,
    }
}

fn disaster_articles() -> Vec<NewsArticle> {
    vec![
        mock_article(
            "Heavy Rainfall Causes Flooding in Mumbai",
            "Mumbai experiences severe flooding due to heavy monsoon rains affecting thousands of residents.",
            "mumbai-flood",
            "Mock News Network",
            "Weather Reporter",
            2,
            0.9,
        ),
        mock_article(
            "Earthquake Alert: 5.2 Magnitude Tremor Hits Delhi",
            "Mild earthquake felt across Delhi NCR region, no major damage reported.",
            "delhi-earthquake",
            "Mock Seismic Center",
            "Seismology Expert",
            4,
            0.95,
        ),
        mock_article(
            "Wildfire Warning Issued for California",
            "High winds and dry conditions create extreme fire risk across multiple counties.",
            "california-fire-warning",
            "Mock Fire Department",
            "Fire Chief",
            6,
            0.85,
        ),
    ]
}

#[async_trait]
impl NewsProvider for MockNewsProvider {
    fn kind(&self) -> &'static str {
        "mock"
    }

    async fn disaster_news(&self, limit: u32) -> Result<Vec<NewsArticle>> {
        let mut articles = disaster_articles();
        articles.truncate(limit as usize);
        Ok(articles)
    }

    async fn search_by_location(
        &self,
        location: &str,
        _keywords: &[String],
        limit: u32,
    ) -> Result<Vec<NewsArticle>> {
        let slug = format!("weather-{}", location.to_lowercase().replace(' ', "-"));
        let mut articles = vec![mock_article(
            &format!("Weather Alert for {location}"),
            &format!("Current weather conditions and alerts for {location} area."),
            &slug,
            "Mock Weather Service",
            "Weather Team",
            0,
            0.8,
        )];
        articles.truncate(limit as usize);
        Ok(articles)
    }
}
