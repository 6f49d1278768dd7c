//! Safe zone model (shelters, hospitals, supply centres)

use serde::{Deserialize, Serialize};

use super::location::Coordinates;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SafeZone {
    pub id: String,
    pub name: String,
    pub description: String,
    /// shelter, hospital, supply_center, ...
    pub zone_type: String,
    pub location_lat: f64,
    pub location_lng: f64,
    pub address: String,
    pub capacity: u32,
    pub current_occupancy: u32,
    pub amenities: Vec<String>,
    pub operating_hours: String,
    pub accessibility_features: Vec<String>,
    pub active: bool,
}

impl SafeZone {
    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            lat: self.location_lat,
            lng: self.location_lng,
        }
    }
}

/// A safe zone annotated with its distance from a search point
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct NearbySafeZone {
    #[serde(flatten)]
    pub zone: SafeZone,
    pub distance_km: f64,
    pub estimated_travel_time: String,
}
