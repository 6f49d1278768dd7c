//! News article model shared by the news providers

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NewsArticle {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    pub url: Option<String>,
    pub source: String,
    pub author: String,
    /// RFC 3339 publication time as reported by the source
    pub published_at: String,
    pub image_url: Option<String>,
    /// Which integration produced the article (newsapi, gnews, mock)
    pub api_source: String,
    pub disaster_related: bool,
    pub credibility_score: f64,
}

impl NewsArticle {
    /// Identity used to collapse duplicates: the URL, or the title when the
    /// article has no URL.
    #[must_use]
    pub fn dedup_key(&self) -> &str {
        match self.url.as_deref() {
            Some(url) if !url.is_empty() => url,
            _ => &self.title,
        }
    }

    /// Case-insensitive keyword match against title and description
    #[must_use]
    pub fn mentions_any(&self, keywords: &[&str]) -> bool {
        let title = self.title.to_lowercase();
        let description = self.description.to_lowercase();
        keywords
            .iter()
            .any(|keyword| title.contains(keyword) || description.contains(keyword))
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::article;

    #[test]
    fn test_dedup_key_prefers_url() {
        let a = article("Flood", Some("https://news.test/flood"));
        assert_eq!(a.dedup_key(), "https://news.test/flood");

        let b = article("Flood", None);
        assert_eq!(b.dedup_key(), "Flood");

        let c = article("Flood", Some(""));
        assert_eq!(c.dedup_key(), "Flood");
    }

    #[test]
    fn test_mentions_any_is_case_insensitive() {
        let mut a = article("SEVERE storm approaching", None);
        assert!(a.mentions_any(&["severe"]));

        a.title = "Calm day".to_string();
        a.description = "Authorities order Evacuation".to_string();
        assert!(a.mentions_any(&["evacuation"]));
        assert!(!a.mentions_any(&["earthquake"]));
    }
}
