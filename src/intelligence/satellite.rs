//! Satellite overview embedded in the combined intelligence document

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Placeholder satellite risk layer until an imagery source is wired in
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SatelliteOverview {
    pub flood_risk: SatelliteRisk,
    pub fire_risk: SatelliteRisk,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SatelliteRisk {
    pub risk_level: &'static str,
    pub confidence: f64,
    pub last_updated: DateTime<Utc>,
}

impl SatelliteOverview {
    #[must_use]
    pub fn mock(now: DateTime<Utc>) -> Self {
        Self {
            flood_risk: SatelliteRisk {
                risk_level: "low",
                confidence: 0.7,
                last_updated: now,
            },
            fire_risk: SatelliteRisk {
                risk_level: "medium",
                confidence: 0.8,
                last_updated: now,
            },
        }
    }
}
