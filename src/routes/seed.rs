use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use super::health::MessageResponse;
use crate::{
    auth::services,
    error::{ApiError, ApiResult},
    state::AppState,
};

pub fn seed_routes() -> Router<AppState> {
    Router::new().route("/seed", get(seed))
}

/// Inserts the demo account. Repeat calls leave the store unchanged.
#[instrument(skip(state))]
pub async fn seed(State(state): State<AppState>) -> ApiResult<Json<MessageResponse>> {
    services::seed_demo(&state.db, &state.hasher)
        .await
        .map_err(|e| ApiError::internal("Seed failed", e))?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Seed done!",
    }))
}
