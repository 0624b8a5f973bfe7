use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::PlayerResult;

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub match_url: String,
}

/// `POST /api/v1/process-match`: ranked scoreboard for one match page.
pub async fn process_match(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<Vec<PlayerResult>>, ApiError> {
    let players = state.extractor.extract(&request.match_url).await?;
    Ok(Json(players))
}
