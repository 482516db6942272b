use std::{collections::HashSet, sync::Arc, time::Duration};

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use super::claims::Claims;
use crate::{config::JwtConfig, state::AppState};

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("token expiry is out of range")]
    ExpiryOutOfRange,
}

/// HS256 signing and verification keys, derived once from the process secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
    ttl: Option<Duration>,
}

impl JwtKeys {
    pub fn new(secret: &str, ttl: Option<Duration>) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
            ttl,
        }
    }

    pub fn from_config(cfg: &JwtConfig) -> Self {
        let ttl = cfg
            .ttl_minutes
            .filter(|m| *m > 0)
            .and_then(|m| u64::try_from(m).ok()?.checked_mul(60))
            .map(Duration::from_secs);
        Self::new(&cfg.secret, ttl)
    }

    pub fn issue(&self, user_id: &str) -> Result<String, TokenError> {
        let now = OffsetDateTime::now_utc();
        let exp = self
            .ttl
            .map(|ttl| {
                i64::try_from(ttl.as_secs())
                    .ok()
                    .and_then(|secs| now.checked_add(TimeDuration::seconds(secs)))
                    .map(|exp| exp.unix_timestamp())
                    .ok_or(TokenError::ExpiryOutOfRange)
            })
            .transpose()?;
        let claims = Claims {
            user_id: user_id.to_owned(),
            iat: now.unix_timestamp(),
            exp,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(TokenError::Signing)?;
        debug!(user_id = %user_id, expires = exp.is_some(), "jwt signed");
        Ok(token)
    }

    /// Checks the signature (and `exp` when a TTL is configured) and returns
    /// the embedded user id.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation())
            .map_err(TokenError::Invalid)?;
        debug!(user_id = %data.claims.user_id, "jwt verified");
        Ok(data.claims.user_id)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims = HashSet::new();
        validation.validate_exp = self.ttl.is_some();
        if self.ttl.is_some() {
            validation.required_spec_claims.insert("exp".to_owned());
        }
        validation
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.keys.clone()
    }
}
