//! Overall risk scoring
//!
//! A fixed weighted sum: the extreme-weather level contributes 1 to 4
//! points, every weather alert one point and every high-severity news
//! article one point. The thresholds and keyword list are placeholder
//! policy pending confirmation with the emergency-response team.

use std::collections::HashSet;

use crate::models::{ExtremeWeatherAssessment, NewsArticle, RiskAssessment, RiskLevel, WeatherAlert};

/// Lower-case keywords marking a news article as high severity
pub const HIGH_SEVERITY_KEYWORDS: [&str; 5] = [
    "emergency",
    "evacuation",
    "critical",
    "severe",
    "major disaster",
];

const MAX_CONFIDENCE: f64 = 0.9;
const BASE_CONFIDENCE: f64 = 0.5;
const CONFIDENCE_PER_POINT: f64 = 0.1;

/// Map a total score onto a risk bucket
#[must_use]
pub fn level_for_score(score: u32) -> RiskLevel {
    match score {
        8.. => RiskLevel::Critical,
        5..=7 => RiskLevel::High,
        3..=4 => RiskLevel::Medium,
        _ => RiskLevel::Low,
    }
}

fn default_recommendations(level: RiskLevel) -> &'static [&'static str] {
    match level {
        RiskLevel::Critical => &[
            "Consider immediate evacuation if advised by authorities",
            "Monitor emergency broadcasts continuously",
            "Ensure emergency supplies are ready",
        ],
        RiskLevel::High => &[
            "Stay alert and monitor weather conditions",
            "Prepare emergency kit and evacuation plan",
            "Avoid unnecessary travel",
        ],
        RiskLevel::Medium => &[
            "Stay informed about weather conditions",
            "Check emergency supplies",
        ],
        RiskLevel::Low => &[
            "Continue normal activities",
            "Stay informed about local conditions",
        ],
    }
}

fn recommendations(level: RiskLevel, extreme: Option<&ExtremeWeatherAssessment>) -> Vec<String> {
    let specific = extreme
        .map(|e| e.recommendations.as_slice())
        .unwrap_or_default();

    let mut seen = HashSet::new();
    default_recommendations(level)
        .iter()
        .copied()
        .chain(specific.iter().map(String::as_str))
        .filter(|r| seen.insert(*r))
        .map(str::to_string)
        .collect()
}

/// Combine alerts, the extreme-weather assessment and the general news feed
/// into one assessment. Stateless and deterministic.
#[must_use]
pub fn assess_risk(
    alerts: &[WeatherAlert],
    extreme: Option<&ExtremeWeatherAssessment>,
    news: &[NewsArticle],
) -> RiskAssessment {
    let mut score = extreme.map_or(0, |e| e.risk_level.weight());
    let mut risk_factors = Vec::new();

    let alert_count = u32::try_from(alerts.len()).unwrap_or(u32::MAX);
    score = score.saturating_add(alert_count);
    if alert_count > 0 {
        risk_factors.push(format!("{alert_count} weather alert(s)"));
    }

    let severe_news = news
        .iter()
        .filter(|article| article.mentions_any(&HIGH_SEVERITY_KEYWORDS))
        .count();
    let severe_news = u32::try_from(severe_news).unwrap_or(u32::MAX);
    score = score.saturating_add(severe_news);
    if severe_news > 0 {
        risk_factors.push(format!("{severe_news} high-severity news report(s)"));
    }

    let overall_risk = level_for_score(score);
    let confidence =
        (BASE_CONFIDENCE + CONFIDENCE_PER_POINT * f64::from(score)).min(MAX_CONFIDENCE);

    RiskAssessment {
        overall_risk,
        risk_score: score,
        risk_factors,
        recommendations: recommendations(overall_risk, extreme),
        confidence,
    }
}
