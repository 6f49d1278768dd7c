//! In-memory safe zone directory
//!
//! The store is built once at startup and shared read-only by the handlers.

use std::cmp::Ordering;

use crate::models::{Coordinates, NearbySafeZone, SafeZone};

/// Average travel speed assumed under emergency conditions
const EMERGENCY_TRAVEL_KMH: f64 = 30.0;

const DEMO_CENTER: Coordinates = Coordinates {
    lat: 28.6139,
    lng: 77.2090,
};

/// Human-readable travel time at [`EMERGENCY_TRAVEL_KMH`]
#[must_use]
pub fn estimate_travel_time(distance_km: f64) -> String {
    let minutes = (distance_km / EMERGENCY_TRAVEL_KMH * 60.0).round().max(0.0) as u64;
    if minutes < 60 {
        format!("{minutes} minutes")
    } else {
        format!("{}h {}m", minutes / 60, minutes % 60)
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| (*s).to_string()).collect()
}

#[derive(Debug, Clone, Default)]
pub struct SafeZoneStore {
    zones: Vec<SafeZone>,
}

impl SafeZoneStore {
    #[must_use]
    pub fn new(zones: Vec<SafeZone>) -> Self {
        Self { zones }
    }

    /// Shelter, hospital and supply centre around central New Delhi
    #[must_use]
    pub fn with_demo_zones() -> Self {
        let Coordinates { lat, lng } = DEMO_CENTER;
        Self::new(vec![
            SafeZone {
                id: "1".to_string(),
                name: "Community Center".to_string(),
                description: "Main community center with emergency facilities".to_string(),
                zone_type: "shelter".to_string(),
                location_lat: lat,
                location_lng: lng,
                address: "Central Community Center, Main Street".to_string(),
                capacity: 500,
                current_occupancy: 45,
                amenities: strings(&["Medical", "Food", "Shelter", "Communication"]),
                operating_hours: "24/7 during emergencies".to_string(),
                accessibility_features: strings(&["Wheelchair Access", "Sign Language Support"]),
                active: true,
            },
            SafeZone {
                id: "2".to_string(),
                name: "District General Hospital".to_string(),
                description: "Primary medical facility for emergency care".to_string(),
                zone_type: "hospital".to_string(),
                location_lat: lat + 0.01,
                location_lng: lng + 0.01,
                address: "District Hospital, Medical District".to_string(),
                capacity: 200,
                current_occupancy: 120,
                amenities: strings(&["Emergency Care", "Surgery", "ICU", "Ambulance"]),
                operating_hours: "24/7".to_string(),
                accessibility_features: strings(&["Wheelchair Access", "Emergency Ramps"]),
                active: true,
            },
            SafeZone {
                id: "3".to_string(),
                name: "Relief Distribution Center".to_string(),
                description: "Food and supply distribution point".to_string(),
                zone_type: "supply_center".to_string(),
                location_lat: lat - 0.01,
                location_lng: lng - 0.01,
                address: "Relief Center, Supply District".to_string(),
                capacity: 1000,
                current_occupancy: 200,
                amenities: strings(&[
                    "Food Distribution",
                    "Water Supply",
                    "Basic Supplies",
                    "Information",
                ]),
                operating_hours: "6:00 AM - 10:00 PM".to_string(),
                accessibility_features: strings(&["Ground Level Access", "Multiple Entry Points"]),
                active: true,
            },
        ])
    }

    fn matching<'a>(&'a self, zone_type: Option<&'a str>) -> impl Iterator<Item = &'a SafeZone> {
        self.zones
            .iter()
            .filter(|zone| zone.active)
            .filter(move |zone| zone_type.is_none_or(|t| zone.zone_type == t))
    }

    /// Active zones within `radius_km` of `origin`, nearest first
    #[must_use]
    pub fn nearby(
        &self,
        origin: Coordinates,
        radius_km: f64,
        zone_type: Option<&str>,
        limit: usize,
    ) -> Vec<NearbySafeZone> {
        let mut found: Vec<NearbySafeZone> = self
            .matching(zone_type)
            .filter_map(|zone| {
                let distance_km = origin.distance_km(&zone.coordinates());
                (distance_km <= radius_km).then(|| NearbySafeZone {
                    zone: zone.clone(),
                    distance_km,
                    estimated_travel_time: estimate_travel_time(distance_km),
                })
            })
            .collect();

        found.sort_by(|a, b| {
            a.distance_km
                .partial_cmp(&b.distance_km)
                .unwrap_or(Ordering::Equal)
        });
        found.truncate(limit);
        found
    }

    /// Active zones ordered by name
    #[must_use]
    pub fn list(&self, zone_type: Option<&str>, limit: usize) -> Vec<SafeZone> {
        let mut zones: Vec<SafeZone> = self.matching(zone_type).cloned().collect();
        zones.sort_by(|a, b| a.name.cmp(&b.name));
        zones.truncate(limit);
        zones
    }
}
