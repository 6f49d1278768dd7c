use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{Query, State},
};
use tracing::instrument;

use super::{AppState, envelope::ApiResponse};
use crate::SentinelError;
use crate::intelligence::DisasterIntelligence;
use crate::validation::{self, RawInput};

type IntelligenceResponse = Result<ApiResponse<DisasterIntelligence>, SentinelError>;

async fn respond(state: &AppState, input: &RawInput) -> IntelligenceResponse {
    let query = validation::location_query(input)?;
    let intelligence = state.intelligence.gather(query).await;
    Ok(ApiResponse::ok(intelligence))
}

#[instrument(skip_all)]
pub async fn get_intelligence(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> IntelligenceResponse {
    respond(&state, &RawInput::from_query(params)).await
}

#[instrument(skip_all)]
pub async fn post_intelligence(State(state): State<AppState>, body: Bytes) -> IntelligenceResponse {
    let input = RawInput::from_json_bytes(&body)?;
    respond(&state, &input).await
}
