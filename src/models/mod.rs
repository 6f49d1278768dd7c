//! Data models for the SentinelX service
//!
//! This module contains the transfer shapes organized by concern:
//! - Location: validated query coordinates and flags
//! - Weather: snapshots, forecasts, alerts and extreme-weather assessments
//! - News: articles from the disaster feeds
//! - Risk: ordinal risk levels and the combined assessment
//! - Safe zone: shelters and facilities near a location

pub mod location;
pub mod news;
pub mod risk;
pub mod safe_zone;
pub mod weather;

// Re-export all public types for convenient access
pub use location::{Coordinates, LocationQuery};
pub use news::NewsArticle;
pub use risk::{RiskAssessment, RiskLevel};
pub use safe_zone::{NearbySafeZone, SafeZone};
pub use weather::{
    CurrentConditions, ExtremeWeatherAssessment, ForecastDay, SnapshotLocation, WeatherAlert,
    WeatherSnapshot,
};
