use std::collections::HashMap;

use anyhow::Result;
use axum::{
    body::Bytes,
    extract::{Query, State},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{instrument, warn};

use super::{AppState, envelope::ApiResponse};
use crate::SentinelError;
use crate::satellite::{
    AnalysisQuality, AnalysisType, CombinedRisk, DisasterType, ImageryRequest, SatelliteAnalysis,
    analysis_quality, combined_risk, comprehensive_recommendations, disaster_recommendations,
};
use crate::validation::{FieldValidator, RawInput};

const DEFAULT_BBOX_METERS: u32 = 1000;
const DEFAULT_TIME_RANGE_DAYS: u32 = 7;
const DATA_SOURCES: [&str; 2] = ["sentinel-2", "sentinel-1"];

#[derive(Debug, Serialize)]
pub struct ImageryLocation {
    pub lat: f64,
    pub lng: f64,
    pub bbox_size_meters: u32,
}

#[derive(Debug, Serialize)]
pub struct ProcessingInfo {
    pub processed_at: DateTime<Utc>,
    pub data_sources: [&'static str; 2],
    pub processing_method: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_quality: Option<AnalysisQuality>,
}

#[derive(Debug, Serialize)]
pub struct ImageryReport {
    pub location: ImageryLocation,
    pub disaster_type: DisasterType,
    pub analysis_type: AnalysisType,
    pub time_range_days: u32,
    pub satellite_data: SatelliteAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flood_analysis: Option<SatelliteAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fire_analysis: Option<SatelliteAnalysis>,
    pub processing_info: ProcessingInfo,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ComprehensiveAnalysis {
    pub general: Option<SatelliteAnalysis>,
    pub flood_risk: Option<SatelliteAnalysis>,
    pub fire_risk: Option<SatelliteAnalysis>,
    pub combined_risk: CombinedRisk,
}

#[derive(Debug, Serialize)]
pub struct ComprehensiveReport {
    pub location: ImageryLocation,
    pub disaster_type: DisasterType,
    pub analysis_type: AnalysisType,
    pub time_range_days: u32,
    pub comprehensive_analysis: ComprehensiveAnalysis,
    pub processing_info: ProcessingInfo,
    pub recommendations: Vec<String>,
}

/// `default_type` is used when `disaster_type` is absent; without one the
/// field is required
fn imagery_params(
    input: &RawInput,
    default_type: Option<DisasterType>,
) -> Result<(ImageryRequest, AnalysisType), SentinelError> {
    let mut fields = FieldValidator::new(input);
    let lat = fields.required_f64("lat", -90.0..=90.0);
    let lng = fields.required_f64("lng", -180.0..=180.0);
    let disaster_type = match default_type {
        Some(default) => fields
            .optional_choice::<DisasterType>("disaster_type", DisasterType::NAMES)
            .unwrap_or(default),
        None => fields
            .required_choice::<DisasterType>("disaster_type", DisasterType::NAMES)
            .unwrap_or(DisasterType::Flood),
    };
    let bbox_size = fields.optional_u32("bbox_size", DEFAULT_BBOX_METERS, 100..=10_000);
    let time_range_days = fields.optional_u32("time_range_days", DEFAULT_TIME_RANGE_DAYS, 1..=30);
    let analysis_type = fields
        .optional_choice::<AnalysisType>("analysis_type", AnalysisType::NAMES)
        .unwrap_or_default();

    fields.finish((
        ImageryRequest {
            lat,
            lng,
            disaster_type,
            bbox_size,
            time_range_days,
        },
        analysis_type,
    ))
}

fn location(request: &ImageryRequest) -> ImageryLocation {
    ImageryLocation {
        lat: request.lat,
        lng: request.lng,
        bbox_size_meters: request.bbox_size,
    }
}

fn settle(kind: &str, result: Result<SatelliteAnalysis>) -> Option<SatelliteAnalysis> {
    result
        .map_err(|e| warn!("Satellite {kind} analysis failed: {e:#}"))
        .ok()
}

/// Imagery analysis for one disaster type, plus the dedicated flood or fire
/// analysis when that is the type asked for
#[instrument(skip_all)]
pub async fn get_imagery(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<ApiResponse<ImageryReport>, SentinelError> {
    let input = RawInput::from_query(params);
    let (request, analysis_type) = imagery_params(&input, Some(DisasterType::Flood))?;
    let provider = state.satellite.as_ref();

    let fetch = async {
        let general = provider.disaster_imagery(&request).await?;
        let flood = match request.disaster_type {
            DisasterType::Flood => Some(provider.flood_risk(request.lat, request.lng).await?),
            _ => None,
        };
        let fire = match request.disaster_type {
            DisasterType::Fire => Some(provider.fire_detection(request.lat, request.lng).await?),
            _ => None,
        };
        anyhow::Ok((general, flood, fire))
    };

    let (general, flood_analysis, fire_analysis) = fetch.await.map_err(|e| {
        tracing::error!("Satellite imagery lookup failed: {e:#}");
        SentinelError::internal("Failed to fetch satellite imagery data")
    })?;

    Ok(ApiResponse::ok(ImageryReport {
        location: location(&request),
        disaster_type: request.disaster_type,
        analysis_type,
        time_range_days: request.time_range_days,
        recommendations: disaster_recommendations(request.disaster_type, &general),
        satellite_data: general,
        flood_analysis,
        fire_analysis,
        processing_info: ProcessingInfo {
            processed_at: Utc::now(),
            data_sources: DATA_SOURCES,
            processing_method: "automated_analysis",
            analysis_quality: None,
        },
    }))
}

/// General, flood and fire analyses run concurrently; each may fail on its
/// own and is then reported as `null`
#[instrument(skip_all)]
pub async fn post_imagery(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<ApiResponse<ComprehensiveReport>, SentinelError> {
    let input = RawInput::from_json_bytes(&body)?;
    let (request, analysis_type) = imagery_params(&input, None)?;
    let provider = state.satellite.as_ref();

    let (general, flood, fire) = tokio::join!(
        provider.disaster_imagery(&request),
        provider.flood_risk(request.lat, request.lng),
        provider.fire_detection(request.lat, request.lng),
    );
    let general = settle("general", general);
    let flood = settle("flood", flood);
    let fire = settle("fire", fire);

    let combined = combined_risk(general.as_ref(), flood.as_ref(), fire.as_ref());
    let quality = analysis_quality(&[general.as_ref(), flood.as_ref(), fire.as_ref()]);

    Ok(ApiResponse::ok(ComprehensiveReport {
        location: location(&request),
        disaster_type: request.disaster_type,
        analysis_type,
        time_range_days: request.time_range_days,
        recommendations: comprehensive_recommendations(&combined),
        comprehensive_analysis: ComprehensiveAnalysis {
            general,
            flood_risk: flood,
            fire_risk: fire,
            combined_risk: combined,
        },
        processing_info: ProcessingInfo {
            processed_at: Utc::now(),
            data_sources: DATA_SOURCES,
            processing_method: "comprehensive_analysis",
            analysis_quality: Some(quality),
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_imagery_defaults() {
        let input =
            RawInput::from_json(json!({"lat": 10, "lng": 20, "disaster_type": "storm"})).unwrap();
        let (request, analysis_type) = imagery_params(&input, None).unwrap();
        assert_eq!(request.disaster_type, DisasterType::Storm);
        assert_eq!(request.bbox_size, 1000);
        assert_eq!(request.time_range_days, 7);
        assert_eq!(analysis_type, AnalysisType::RiskAssessment);
    }

    #[test]
    fn test_query_defaults_disaster_type() {
        let params = HashMap::from([
            ("lat".to_string(), "10".to_string()),
            ("lng".to_string(), "20".to_string()),
        ]);
        let input = RawInput::from_query(params);
        let (request, _) = imagery_params(&input, Some(DisasterType::Flood)).unwrap();
        assert_eq!(request.disaster_type, DisasterType::Flood);
    }

    #[test]
    fn test_body_requires_disaster_type_and_ranges() {
        let input = RawInput::from_json(json!({
            "lat": 10,
            "lng": 20,
            "bbox_size": 50,
            "time_range_days": 31,
            "analysis_type": "guesswork"
        }))
        .unwrap();
        let err = imagery_params(&input, None).unwrap_err();
        assert_eq!(
            err.user_message(),
            "Validation error: disaster_type is required, bbox_size must be between 100 and 10000, \
             time_range_days must be between 1 and 30, \
             analysis_type must be one of risk_assessment, change_detection, damage_assessment"
        );
    }
}
