//! Risk levels and the derived risk assessment

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordinal risk bucket. Ordering follows severity.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Points this level contributes to the overall risk score
    #[must_use]
    pub fn weight(self) -> u32 {
        match self {
            RiskLevel::Critical => 4,
            RiskLevel::High => 3,
            RiskLevel::Medium => 2,
            RiskLevel::Low => 1,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overall risk for a location, recomputed on every request
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RiskAssessment {
    pub overall_risk: RiskLevel,
    pub risk_score: u32,
    pub risk_factors: Vec<String>,
    pub recommendations: Vec<String>,
    /// Between 0.5 and 0.9
    pub confidence: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_ordered() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
        assert!(RiskLevel::High < RiskLevel::Critical);
    }

    #[test]
    fn test_level_serialization() {
        assert_eq!(
            serde_json::to_string(&RiskLevel::Critical).unwrap(),
            "\"CRITICAL\""
        );
        let level: RiskLevel = serde_json::from_str("\"MEDIUM\"").unwrap();
        assert_eq!(level, RiskLevel::Medium);
        assert_eq!(RiskLevel::High.to_string(), "HIGH");
    }
}
