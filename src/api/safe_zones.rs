use std::collections::HashMap;

use axum::extract::{Query, State};
use serde::Serialize;

use super::{AppState, envelope::ApiResponse};
use crate::SentinelError;
use crate::models::{Coordinates, NearbySafeZone, SafeZone};
use crate::validation::{FieldValidator, RawInput};

const DEFAULT_RADIUS_KM: f64 = 10.0;
const DEFAULT_LIMIT: u32 = 50;

/// Nearby search results carry distances, plain listings do not
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SafeZoneList {
    Nearby(Vec<NearbySafeZone>),
    All(Vec<SafeZone>),
}

impl SafeZoneList {
    fn len(&self) -> usize {
        match self {
            SafeZoneList::Nearby(zones) => zones.len(),
            SafeZoneList::All(zones) => zones.len(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchCriteria {
    pub location: Option<Coordinates>,
    pub radius_km: Option<f64>,
    pub zone_type: Option<String>,
    pub limit: u32,
}

#[derive(Debug, Serialize)]
pub struct SafeZoneResults {
    pub safe_zones: SafeZoneList,
    pub total: usize,
    pub search_criteria: SearchCriteria,
}

pub async fn safe_zones(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<ApiResponse<SafeZoneResults>, SentinelError> {
    let input = RawInput::from_query(params);
    let mut fields = FieldValidator::new(&input);

    let origin = if input.contains("lat") || input.contains("lng") {
        let lat = fields.required_f64("lat", -90.0..=90.0);
        let lng = fields.required_f64("lng", -180.0..=180.0);
        Some(Coordinates { lat, lng })
    } else {
        None
    };
    let radius_km = fields.optional_f64("radius", DEFAULT_RADIUS_KM, 0.0..=20_000.0);
    let zone_type = fields.optional_string("zone_type");
    let limit = fields.optional_u32("limit", DEFAULT_LIMIT, 1..=100);
    fields.finish(())?;

    let store = &state.safe_zones;
    let safe_zones = match origin {
        Some(origin) => SafeZoneList::Nearby(store.nearby(
            origin,
            radius_km,
            zone_type.as_deref(),
            limit as usize,
        )),
        None => SafeZoneList::All(store.list(zone_type.as_deref(), limit as usize)),
    };

    Ok(ApiResponse::ok(SafeZoneResults {
        total: safe_zones.len(),
        safe_zones,
        search_criteria: SearchCriteria {
            location: origin,
            radius_km: origin.map(|_| radius_km),
            zone_type,
            limit,
        },
    }))
}
