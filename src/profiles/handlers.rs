use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tracing::{instrument, warn};

use super::repo::Profile;
use crate::{
    auth::extractors::AuthUser,
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub profile: Profile,
}

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<ProfileResponse>> {
    let profile = Profile::find_by_user_id(&state.db, &user_id)
        .await?
        .ok_or_else(|| {
            warn!(user_id = %user_id, "profile not found");
            ApiError::NotFound("Profile not found".into())
        })?;

    Ok(Json(ProfileResponse {
        success: true,
        profile,
    }))
}
