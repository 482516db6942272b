use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/test", get(health))
}

pub async fn health() -> Json<MessageResponse> {
    Json(MessageResponse {
        success: true,
        message: "Backend working",
    })
}
