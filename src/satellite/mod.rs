//! Satellite imagery analysis
//!
//! [`SatelliteProvider`] mirrors the weather and news seams: handlers ask
//! for flood, fire or general imagery analyses and the provider decides
//! where they come from. Only [`MockSatelliteProvider`] exists today; it
//! returns fixed analyses shaped like a Sentinel-1/2 processing result.
//!
//! The scoring helpers below combine whichever analyses came back into one
//! confidence-weighted risk, grade the overall analysis quality and derive
//! recommendations.

use std::collections::HashSet;
use std::str::FromStr;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub mod mock;

pub use mock::MockSatelliteProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisasterType {
    Flood,
    Fire,
    Landslide,
    Earthquake,
    Storm,
}

impl DisasterType {
    pub const NAMES: &'static [&'static str] =
        &["flood", "fire", "landslide", "earthquake", "storm"];
}

impl FromStr for DisasterType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flood" => Ok(Self::Flood),
            "fire" => Ok(Self::Fire),
            "landslide" => Ok(Self::Landslide),
            "earthquake" => Ok(Self::Earthquake),
            "storm" => Ok(Self::Storm),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisType {
    #[default]
    RiskAssessment,
    ChangeDetection,
    DamageAssessment,
}

impl AnalysisType {
    pub const NAMES: &'static [&'static str] =
        &["risk_assessment", "change_detection", "damage_assessment"];
}

impl FromStr for AnalysisType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "risk_assessment" => Ok(Self::RiskAssessment),
            "change_detection" => Ok(Self::ChangeDetection),
            "damage_assessment" => Ok(Self::DamageAssessment),
            _ => Err(()),
        }
    }
}

/// Risk grade of an imagery analysis. `Unknown` only appears in a combined
/// risk with nothing to weigh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageryRisk {
    Unknown,
    Low,
    Medium,
    High,
    Critical,
}

impl ImageryRisk {
    /// Numeric weight used when averaging analyses
    #[must_use]
    pub fn value(self) -> f64 {
        match self {
            ImageryRisk::Unknown => 0.0,
            ImageryRisk::Low => 1.0,
            ImageryRisk::Medium => 2.0,
            ImageryRisk::High => 3.0,
            ImageryRisk::Critical => 4.0,
        }
    }

    fn from_average(average: f64) -> Self {
        if average >= 3.5 {
            ImageryRisk::Critical
        } else if average >= 2.5 {
            ImageryRisk::High
        } else if average >= 1.5 {
            ImageryRisk::Medium
        } else {
            ImageryRisk::Low
        }
    }

    fn is_elevated(self) -> bool {
        self >= ImageryRisk::High
    }
}

/// One imagery request as validated by the handler
#[derive(Debug, Clone, PartialEq)]
pub struct ImageryRequest {
    pub lat: f64,
    pub lng: f64,
    pub disaster_type: DisasterType,
    /// Side of the analysed box in metres
    pub bbox_size: u32,
    pub time_range_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageryMetadata {
    pub satellite: String,
    pub resolution: String,
    /// Percent
    pub cloud_coverage: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SatelliteAnalysis {
    pub risk_level: ImageryRisk,
    pub confidence: f64,
    pub detected_features: Vec<String>,
    pub analysis_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub metadata: ImageryMetadata,
}

#[async_trait]
pub trait SatelliteProvider: Send + Sync {
    /// Short label reported by the health endpoint
    fn kind(&self) -> &'static str;

    async fn flood_risk(&self, lat: f64, lng: f64) -> Result<SatelliteAnalysis>;

    async fn fire_detection(&self, lat: f64, lng: f64) -> Result<SatelliteAnalysis>;

    /// Analysis for disaster types without a dedicated detector
    async fn general_analysis(&self, request: &ImageryRequest) -> Result<SatelliteAnalysis>;

    /// Routes flood and fire requests to their detectors
    async fn disaster_imagery(&self, request: &ImageryRequest) -> Result<SatelliteAnalysis> {
        match request.disaster_type {
            DisasterType::Flood => self.flood_risk(request.lat, request.lng).await,
            DisasterType::Fire => self.fire_detection(request.lat, request.lng).await,
            _ => self.general_analysis(request).await,
        }
    }
}

/// Confidence of each analysis; 0 when it is missing
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskFactors {
    pub flood_risk: f64,
    pub fire_risk: f64,
    pub general_risk: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedRisk {
    pub overall_risk: ImageryRisk,
    pub confidence: f64,
    pub primary_threats: Vec<String>,
    pub risk_factors: RiskFactors,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn confidence_of(analysis: Option<&SatelliteAnalysis>) -> f64 {
    analysis.map_or(0.0, |a| a.confidence)
}

/// Confidence-weighted average of the analyses that came back.
///
/// Features of high or critical analyses become the primary threats.
/// Without any analysis, or when every confidence is zero, the result is
/// `unknown` with confidence 0.
#[must_use]
pub fn combined_risk(
    general: Option<&SatelliteAnalysis>,
    flood: Option<&SatelliteAnalysis>,
    fire: Option<&SatelliteAnalysis>,
) -> CombinedRisk {
    let risk_factors = RiskFactors {
        flood_risk: confidence_of(flood),
        fire_risk: confidence_of(fire),
        general_risk: confidence_of(general),
    };
    let analyses: Vec<&SatelliteAnalysis> = [general, flood, fire].into_iter().flatten().collect();

    let total_confidence: f64 = analyses.iter().map(|a| a.confidence).sum();
    if analyses.is_empty() || total_confidence <= 0.0 {
        return CombinedRisk {
            overall_risk: ImageryRisk::Unknown,
            confidence: 0.0,
            primary_threats: Vec::new(),
            risk_factors,
        };
    }

    let weighted: f64 = analyses
        .iter()
        .map(|a| a.risk_level.value() * a.confidence)
        .sum();

    let mut seen = HashSet::new();
    let primary_threats = analyses
        .iter()
        .filter(|a| a.risk_level.is_elevated())
        .flat_map(|a| a.detected_features.iter())
        .filter(|feature| seen.insert(feature.as_str()))
        .cloned()
        .collect();

    CombinedRisk {
        overall_risk: ImageryRisk::from_average(weighted / total_confidence),
        confidence: round2(total_confidence / analyses.len() as f64),
        primary_threats,
        risk_factors,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisQuality {
    Poor,
    Fair,
    Good,
    Excellent,
}

/// Grade by mean confidence of the analyses that came back
#[must_use]
pub fn analysis_quality(analyses: &[Option<&SatelliteAnalysis>]) -> AnalysisQuality {
    let present: Vec<f64> = analyses.iter().flatten().map(|a| a.confidence).collect();
    if present.is_empty() {
        return AnalysisQuality::Poor;
    }
    let mean = round2(present.iter().sum::<f64>() / present.len() as f64);
    match mean {
        m if m >= 0.8 => AnalysisQuality::Excellent,
        m if m >= 0.6 => AnalysisQuality::Good,
        m if m >= 0.4 => AnalysisQuality::Fair,
        _ => AnalysisQuality::Poor,
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Advice for a single-analysis imagery request
#[must_use]
pub fn disaster_recommendations(
    disaster_type: DisasterType,
    analysis: &SatelliteAnalysis,
) -> Vec<String> {
    let elevated = analysis.risk_level.is_elevated();
    match disaster_type {
        DisasterType::Flood if elevated => strings(&[
            "Avoid low-lying areas and flood-prone zones",
            "Monitor water levels and evacuation routes",
            "Prepare emergency supplies and evacuation plan",
        ]),
        DisasterType::Flood => strings(&[
            "Stay aware of weather conditions",
            "Know your evacuation routes",
        ]),
        DisasterType::Fire if elevated => strings(&[
            "Create defensible space around property",
            "Prepare for potential evacuation",
            "Monitor fire weather conditions",
        ]),
        DisasterType::Fire => strings(&[
            "Maintain fire safety precautions",
            "Keep emergency kit ready",
        ]),
        _ => strings(&[
            "Monitor local emergency services",
            "Stay informed about conditions",
        ]),
    }
}

/// Advice for a combined risk, plus threat-specific additions
#[must_use]
pub fn comprehensive_recommendations(combined: &CombinedRisk) -> Vec<String> {
    let mut recommendations = match combined.overall_risk {
        ImageryRisk::Critical | ImageryRisk::High => strings(&[
            "Consider evacuation if advised by authorities",
            "Monitor emergency broadcasts continuously",
            "Ensure emergency supplies are ready",
        ]),
        ImageryRisk::Medium => strings(&[
            "Stay alert and prepared",
            "Monitor local conditions",
            "Review emergency plans",
        ]),
        ImageryRisk::Low | ImageryRisk::Unknown => strings(&[
            "Continue normal activities with awareness",
            "Stay informed about local conditions",
        ]),
    };

    let threatened = |feature: &str| combined.primary_threats.iter().any(|t| t == feature);
    if threatened("water_bodies") {
        recommendations.push("Avoid areas near water bodies".to_string());
    }
    if threatened("dry_vegetation") {
        recommendations.push("Exercise fire safety precautions".to_string());
    }
    recommendations
}
