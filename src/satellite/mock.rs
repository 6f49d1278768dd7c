use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;

use super::{ImageryMetadata, ImageryRequest, ImageryRisk, SatelliteAnalysis, SatelliteProvider};

/// Fixed analyses served while no imagery source is configured
#[derive(Debug, Clone, Default)]
pub struct MockSatelliteProvider;

impl MockSatelliteProvider {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn mock_analysis(
    risk_level: ImageryRisk,
    confidence: f64,
    features: &[&str],
    cloud_coverage: u8,
) -> SatelliteAnalysis {
    SatelliteAnalysis {
        risk_level,
        confidence,
        detected_features: features.iter().map(|f| (*f).to_string()).collect(),
        analysis_date: Utc::now(),
        image_url: None,
        metadata: ImageryMetadata {
            satellite: "Mock Satellite".to_string(),
            resolution: "10m".to_string(),
            cloud_coverage,
        },
    }
}

#[async_trait]
impl SatelliteProvider for MockSatelliteProvider {
    fn kind(&self) -> &'static str {
        "mock"
    }

    async fn flood_risk(&self, _lat: f64, _lng: f64) -> Result<SatelliteAnalysis> {
        Ok(mock_analysis(
            ImageryRisk::Low,
            0.6,
            &["normal_water_levels", "no_flooding_detected"],
            20,
        ))
    }

    async fn fire_detection(&self, _lat: f64, _lng: f64) -> Result<SatelliteAnalysis> {
        Ok(mock_analysis(
            ImageryRisk::Medium,
            0.7,
            &["dry_vegetation", "elevated_temperature"],
            5,
        ))
    }

    async fn general_analysis(&self, _request: &ImageryRequest) -> Result<SatelliteAnalysis> {
        Ok(mock_analysis(ImageryRisk::Low, 0.5, &["normal_conditions"], 25))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::satellite::DisasterType;

    fn request(disaster_type: DisasterType) -> ImageryRequest {
        ImageryRequest {
            lat: 28.6,
            lng: 77.2,
            disaster_type,
            bbox_size: 1000,
            time_range_days: 7,
        }
    }

    #[tokio::test]
    async fn test_imagery_routed_by_disaster_type() {
        let provider = MockSatelliteProvider::new();

        let flood = provider.disaster_imagery(&request(DisasterType::Flood)).await.unwrap();
        assert_eq!(flood.confidence, 0.6);
        assert!(flood.detected_features.contains(&"no_flooding_detected".to_string()));

        let fire = provider.disaster_imagery(&request(DisasterType::Fire)).await.unwrap();
        assert_eq!(fire.risk_level, ImageryRisk::Medium);

        let quake = provider.disaster_imagery(&request(DisasterType::Earthquake)).await.unwrap();
        assert_eq!(quake.detected_features, vec!["normal_conditions"]);
        assert_eq!(quake.metadata.cloud_coverage, 25);
    }
}
