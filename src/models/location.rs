//! Location models for validated request coordinates

use serde::{Deserialize, Serialize};

pub const DEFAULT_RADIUS_KM: u32 = 50;
pub const DEFAULT_NEWS_LIMIT: u32 = 20;

/// A validated disaster-intelligence query. Built once per request by
/// [`crate::validation`] and never mutated afterwards.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LocationQuery {
    /// Latitude in decimal degrees, within [-90, 90]
    #[serde(rename = "lat")]
    pub latitude: f64,
    /// Longitude in decimal degrees, within [-180, 180]
    #[serde(rename = "lng")]
    pub longitude: f64,
    /// Free-text place name used for location-scoped news
    #[serde(rename = "name")]
    pub location_name: Option<String>,
    /// Search radius in kilometres, within [1, 100]
    pub radius_km: u32,
    pub include_forecast: bool,
    pub include_satellite: bool,
    /// Maximum number of news articles returned, within [1, 50]
    pub news_limit: u32,
}

impl LocationQuery {
    /// Create a query with the default radius, flags and news limit
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            location_name: None,
            radius_km: DEFAULT_RADIUS_KM,
            include_forecast: true,
            include_satellite: true,
            news_limit: DEFAULT_NEWS_LIMIT,
        }
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Plain latitude/longitude pair as it appears on the wire
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Great-circle distance in kilometres
    #[must_use]
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        haversine::distance(
            haversine::Location {
                latitude: self.lat,
                longitude: self.lng,
            },
            haversine::Location {
                latitude: other.lat,
                longitude: other.lng,
            },
            haversine::Units::Kilometers,
        )
    }
}
