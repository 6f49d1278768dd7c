//! Live news provider backed by NewsAPI and GNews
//!
//! The general feed asks NewsAPI first and tops up from GNews when fewer
//! than `limit` articles came back. Location searches use whichever source
//! is configured, NewsAPI preferred.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use super::{NewsProvider, dedup_articles, location_query};
use crate::SentinelError;
use crate::config::NewsConfig;
use crate::models::NewsArticle;

const NEWSAPI_DISASTER_QUERY: &str = "disaster OR earthquake OR flood OR hurricane OR wildfire OR tsunami OR emergency OR evacuation OR storm OR cyclone OR landslide OR drought";
const GNEWS_DISASTER_QUERY: &str = "disaster OR emergency OR earthquake OR flood OR hurricane";

const NEWSAPI_CREDIBILITY: f64 = 0.8;
const GNEWS_CREDIBILITY: f64 = 0.75;

/// One upstream news API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    NewsApi,
    GNews,
}

impl Source {
    fn label(self) -> &'static str {
        match self {
            Source::NewsApi => "newsapi",
            Source::GNews => "gnews",
        }
    }
}

struct SourceClient {
    source: Source,
    base_url: String,
    api_key: String,
}

impl SourceClient {
    fn search_url(&self, query: &str, limit: u32, general_feed: bool) -> String {
        let query = urlencoding::encode(query);
        let key = urlencoding::encode(&self.api_key);
        match self.source {
            Source::NewsApi => format!(
                "{}/everything?q={query}&sortBy=publishedAt&pageSize={limit}&apiKey={key}",
                self.base_url
            ),
            Source::GNews if general_feed => format!(
                "{}/search?q={query}&lang=en&country=us&max={limit}&apikey={key}",
                self.base_url
            ),
            Source::GNews => format!(
                "{}/search?q={query}&lang=en&max={limit}&apikey={key}",
                self.base_url
            ),
        }
    }
}

pub struct LiveNewsProvider {
    client: Client,
    newsapi: Option<SourceClient>,
    gnews: Option<SourceClient>,
}

impl LiveNewsProvider {
    /// Build the provider, or `None` when neither API key is configured
    pub fn from_config(config: &NewsConfig) -> Result<Option<Self>> {
        let newsapi = config.newsapi_key.clone().map(|api_key| SourceClient {
            source: Source::NewsApi,
            base_url: config.newsapi_base_url.trim_end_matches('/').to_string(),
            api_key,
        });
        let gnews = config.gnews_key.clone().map(|api_key| SourceClient {
            source: Source::GNews,
            base_url: config.gnews_base_url.trim_end_matches('/').to_string(),
            api_key,
        });

        if newsapi.is_none() && gnews.is_none() {
            return Ok(None);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("SentinelX/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Some(Self {
            client,
            newsapi,
            gnews,
        }))
    }

    #[instrument(skip(self, source), fields(api = source.source.label()))]
    async fn fetch(
        &self,
        source: &SourceClient,
        query: &str,
        limit: u32,
        general_feed: bool,
    ) -> Result<Vec<NewsArticle>> {
        let url = source.search_url(query, limit, general_feed);
        let response = self.client.get(&url).send().await.map_err(|e| {
            SentinelError::api(format!("Network error calling {}: {e}", source.source.label()))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SentinelError::api(format!(
                "{} error: {}",
                source.source.label(),
                status.as_u16()
            ))
            .into());
        }

        let articles = match source.source {
            Source::NewsApi => response
                .json::<NewsApiResponse>()
                .await
                .with_context(|| "Failed to parse NewsAPI response")?
                .articles
                .into_iter()
                .map(NewsApiArticle::into_article)
                .collect::<Vec<_>>(),
            Source::GNews => response
                .json::<GNewsResponse>()
                .await
                .with_context(|| "Failed to parse GNews response")?
                .articles
                .into_iter()
                .map(GNewsArticle::into_article)
                .collect(),
        };

        debug!("Received {} articles", articles.len());
        Ok(articles)
    }
}

#[async_trait]
impl NewsProvider for LiveNewsProvider {
    fn kind(&self) -> &'static str {
        "live"
    }

    #[instrument(skip(self))]
    async fn disaster_news(&self, limit: u32) -> Result<Vec<NewsArticle>> {
        let mut articles = Vec::new();
        let mut last_error = None;

        if let Some(newsapi) = &self.newsapi {
            match self.fetch(newsapi, NEWSAPI_DISASTER_QUERY, limit, true).await {
                Ok(found) => articles.extend(found),
                Err(e) => {
                    warn!("NewsAPI disaster feed failed: {e:#}");
                    last_error = Some(e);
                }
            }
        }

        let missing = limit.saturating_sub(u32::try_from(articles.len()).unwrap_or(u32::MAX));
        if missing > 0 {
            if let Some(gnews) = &self.gnews {
                match self.fetch(gnews, GNEWS_DISASTER_QUERY, missing, true).await {
                    Ok(found) => articles.extend(found),
                    Err(e) => {
                        warn!("GNews disaster feed failed: {e:#}");
                        last_error = Some(e);
                    }
                }
            }
        }

        if articles.is_empty() {
            if let Some(e) = last_error {
                return Err(e);
            }
        }

        let mut unique = dedup_articles(articles);
        unique.truncate(limit as usize);
        info!("Disaster feed returned {} articles", unique.len());
        Ok(unique)
    }

    #[instrument(skip(self))]
    async fn search_by_location(
        &self,
        location: &str,
        keywords: &[String],
        limit: u32,
    ) -> Result<Vec<NewsArticle>> {
        let query = location_query(location, keywords);
        let source = self
            .newsapi
            .as_ref()
            .or(self.gnews.as_ref())
            .ok_or_else(|| SentinelError::config("No news source configured"))?;
        self.fetch(source, &query, limit, false).await
    }
}

#[derive(Debug, Deserialize)]
struct NamedSource {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiArticle {
    title: Option<String>,
    description: Option<String>,
    content: Option<String>,
    url: Option<String>,
    source: Option<NamedSource>,
    author: Option<String>,
    published_at: Option<String>,
    url_to_image: Option<String>,
}

impl NewsApiArticle {
    fn into_article(self) -> NewsArticle {
        NewsArticle {
            title: self.title.unwrap_or_else(|| "Untitled".to_string()),
            description: self.description.unwrap_or_default(),
            content: self.content.unwrap_or_default(),
            url: self.url,
            source: self
                .source
                .and_then(|s| s.name)
                .unwrap_or_else(|| "Unknown".to_string()),
            author: self.author.unwrap_or_else(|| "Unknown".to_string()),
            published_at: self.published_at.unwrap_or_else(|| Utc::now().to_rfc3339()),
            image_url: self.url_to_image,
            api_source: Source::NewsApi.label().to_string(),
            disaster_related: true,
            credibility_score: NEWSAPI_CREDIBILITY,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GNewsResponse {
    #[serde(default)]
    articles: Vec<GNewsArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GNewsArticle {
    title: Option<String>,
    description: Option<String>,
    content: Option<String>,
    url: Option<String>,
    source: Option<NamedSource>,
    published_at: Option<String>,
    image: Option<String>,
}

impl GNewsArticle {
    fn into_article(self) -> NewsArticle {
        NewsArticle {
            title: self.title.unwrap_or_else(|| "Untitled".to_string()),
            description: self.description.unwrap_or_default(),
            content: self.content.unwrap_or_default(),
            url: self.url,
            source: self
                .source
                .and_then(|s| s.name)
                .unwrap_or_else(|| "Unknown".to_string()),
            author: "Unknown".to_string(),
            published_at: self.published_at.unwrap_or_else(|| Utc::now().to_rfc3339()),
            image_url: self.image,
            api_source: Source::GNews.label().to_string(),
            disaster_related: true,
            credibility_score: GNEWS_CREDIBILITY,
        }
    }
}
