use std::collections::HashMap;

use axum::extract::{Query, State};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::instrument;

use super::{AppState, envelope::ApiResponse};
use crate::SentinelError;
use crate::models::NewsArticle;
use crate::news::distinct_by;
use crate::validation::{FieldValidator, RawInput};

const DEFAULT_FEED_LIMIT: u32 = 50;

#[derive(Debug, Serialize)]
pub struct DisasterFeed {
    pub articles: Vec<NewsArticle>,
    pub total: usize,
    /// Distinct upstream APIs that contributed articles
    pub sources: Vec<String>,
    pub location: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub last_updated: DateTime<Utc>,
}

#[instrument(skip_all)]
pub async fn disaster_feed(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<ApiResponse<DisasterFeed>, SentinelError> {
    let input = RawInput::from_query(params);
    let mut fields = FieldValidator::new(&input);
    let limit = fields.optional_u32("limit", DEFAULT_FEED_LIMIT, 1..=100);
    let location = fields.optional_string("location");
    let keywords = fields.optional_list("keywords");
    fields.finish(())?;

    let articles = match &location {
        Some(location) => {
            state
                .news
                .search_by_location(location, keywords.as_deref().unwrap_or_default(), limit)
                .await
        }
        None => state.news.disaster_news(limit).await,
    }
    .map_err(|e| {
        tracing::error!("News lookup failed: {e:#}");
        SentinelError::internal("Failed to fetch disaster news")
    })?;

    let sources = distinct_by(&articles, |a| a.api_source.as_str());
    Ok(ApiResponse::ok(DisasterFeed {
        total: articles.len(),
        articles,
        sources,
        location,
        keywords,
        last_updated: Utc::now(),
    }))
}
