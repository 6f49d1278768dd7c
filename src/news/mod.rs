//! News providers and deduplication
//!
//! [`NewsProvider`] abstracts the disaster news sources. [`LiveNewsProvider`]
//! combines NewsAPI and GNews; [`MockNewsProvider`] serves canned articles
//! when neither key is configured.

use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::NewsArticle;

pub mod live;
pub mod mock;

pub use live::LiveNewsProvider;
pub use mock::MockNewsProvider;

/// Used for location searches when the caller supplies no keywords
pub const DEFAULT_LOCATION_KEYWORDS: [&str; 5] =
    ["disaster", "emergency", "weather", "alert", "warning"];

#[async_trait]
pub trait NewsProvider: Send + Sync {
    /// Short label reported by the health endpoint ("live" or "mock")
    fn kind(&self) -> &'static str;

    /// General disaster feed, at most `limit` articles
    async fn disaster_news(&self, limit: u32) -> Result<Vec<NewsArticle>>;

    /// News mentioning `location` together with any of `keywords`
    async fn search_by_location(
        &self,
        location: &str,
        keywords: &[String],
        limit: u32,
    ) -> Result<Vec<NewsArticle>>;
}

/// Keep the first article for each URL (or title, when there is no URL),
/// preserving order.
#[must_use]
pub fn dedup_articles(articles: Vec<NewsArticle>) -> Vec<NewsArticle> {
    let mut seen = HashSet::new();
    articles
        .into_iter()
        .filter(|article| seen.insert(article.dedup_key().to_string()))
        .collect()
}

/// Distinct values of `field` in first-seen order
pub fn distinct_by<'a>(
    articles: &'a [NewsArticle],
    field: impl Fn(&'a NewsArticle) -> &'a str,
) -> Vec<String> {
    let mut seen = HashSet::new();
    articles
        .iter()
        .map(field)
        .filter(|value| seen.insert(*value))
        .map(str::to_string)
        .collect()
}

/// Search query of the form `<location> AND (k1 OR k2 ...)`
#[must_use]
pub fn location_query(location: &str, keywords: &[String]) -> String {
    let terms: Vec<&str> = if keywords.is_empty() {
        DEFAULT_LOCATION_KEYWORDS.to_vec()
    } else {
        keywords.iter().map(String::as_str).collect()
    };
    format!("{location} AND ({})", terms.join(" OR "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::news::fixtures::article;

    #[test]
    fn test_dedup_first_seen_wins() {
        let articles = vec![
            article("Flood in Mumbai", Some("https://a.test/1")),
            article("Mumbai flooding update", Some("https://a.test/1")),
            article("Quake", None),
            article("Quake", None),
            article("Storm", Some("https://a.test/2")),
        ];
        let unique = dedup_articles(articles);
        let titles: Vec<_> = unique.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Flood in Mumbai", "Quake", "Storm"]);
    }

    #[test]
    fn test_dedup_is_idempotent() {
        let articles = vec![
            article("A", Some("https://a.test/a")),
            article("B", None),
            article("A again", Some("https://a.test/a")),
        ];
        let once = dedup_articles(articles);
        let twice = dedup_articles(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_distinct_sources() {
        let mut a = article("A", None);
        a.source = "Wire".to_string();
        let mut b = article("B", None);
        b.source = "Daily".to_string();
        let mut c = article("C", None);
        c.source = "Wire".to_string();
        let articles = vec![a, b, c];
        assert_eq!(distinct_by(&articles, |a| a.source.as_str()), vec!["Wire", "Daily"]);
    }

    #[test]
    fn test_location_query_defaults() {
        assert_eq!(
            location_query("Delhi", &[]),
            "Delhi AND (disaster OR emergency OR weather OR alert OR warning)"
        );
        assert_eq!(
            location_query("Delhi", &["flood".to_string(), "rain".to_string()]),
            "Delhi AND (flood OR rain)"
        );
    }
}
