use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use tracing::warn;

use super::jwt::JwtKeys;
use crate::error::ApiError;

/// Extracts and validates the bearer token, returning the user id.
///
/// A missing header, a non-Bearer scheme, or an empty token is a 401.
/// A token that fails verification is a 403.
pub struct AuthUser(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| ApiError::Unauthorized("No token".into()))?;

        let keys = JwtKeys::from_ref(state);
        let user_id = keys.verify(token).map_err(|e| {
            warn!(error = %e, "rejected bearer token");
            ApiError::Forbidden("Invalid token".into())
        })?;

        Ok(AuthUser(user_id))
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
