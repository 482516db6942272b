use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, SignupRequest, TokenResponse},
        services::{self, is_valid_email},
    },
    error::{ApiError, ApiResult},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> ApiResult<Json<TokenResponse>> {
    let Json(payload) = payload?;

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::BadRequest("Invalid email".into()));
    }
    if payload.password.is_empty() {
        warn!("empty password");
        return Err(ApiError::BadRequest("Password is required".into()));
    }

    let registered = services::register(
        &state.db,
        &state.hasher,
        &state.keys,
        &payload.email,
        &payload.password,
        &payload.name,
    )
    .await?;

    Ok(Json(TokenResponse::new(registered.token)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<TokenResponse>> {
    let Json(payload) = payload?;
    let (_, token) = services::login(&state.db, &state.keys, &payload.email, &payload.password).await?;
    Ok(Json(TokenResponse::new(token)))
}
