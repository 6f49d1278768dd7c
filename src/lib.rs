//! `SentinelX` - Disaster intelligence aggregation service
//!
//! This library combines weather, news, satellite and safe-zone data for a location
//! into one risk-scored document and serves it over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod intelligence;
pub mod logging;
pub mod models;
pub mod news;
pub mod safe_zones;
pub mod satellite;
pub mod validation;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use config::SentinelConfig;
pub use error::SentinelError;
pub use intelligence::{DisasterIntelligence, IntelligenceService};
pub use models::{LocationQuery, RiskAssessment, RiskLevel};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, SentinelError>;
