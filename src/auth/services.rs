use lazy_static::lazy_static;
use regex::Regex;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    auth::{
        jwt::{JwtKeys, TokenError},
        password::{verify_password_async, Hasher},
        repo_types::User,
    },
    db::StoreError,
    error::ApiError,
    ids::generate_id,
    profiles::repo::Profile,
};

pub const SEED_EMAIL: &str = "jay@test.com";
pub const SEED_PASSWORD: &str = "password123";
pub const SEED_NAME: &str = "阿傑";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already exists")]
    EmailTaken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EmailTaken => ApiError::BadRequest("Email already exists".into()),
            AuthError::InvalidCredentials => ApiError::Unauthorized("Invalid credentials".into()),
            AuthError::Store(e) => e.into(),
            AuthError::Token(e) => ApiError::internal("Internal server error", e),
            AuthError::Internal(e) => ApiError::internal("Internal server error", e),
        }
    }
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Outcome of a successful signup.
#[derive(Debug)]
pub struct Registered {
    pub user_id: String,
    pub token: String,
}

/// Creates a user and its profile in one transaction and issues a token.
/// Nothing is persisted if either insert fails.
pub async fn register(
    db: &SqlitePool,
    hasher: &Hasher,
    keys: &JwtKeys,
    email: &str,
    password: &str,
    name: &str,
) -> Result<Registered, AuthError> {
    let hash = hasher.hash_async(password.to_owned()).await?;
    let user_id = generate_id();
    let token = keys.issue(&user_id)?;

    let mut tx = db.begin().await.map_err(StoreError::from)?;
    if let Err(e) = User::insert(&mut *tx, &user_id, email, &hash).await {
        if e.is_duplicate_email() {
            warn!(email = %email, "email already registered");
            return Err(AuthError::EmailTaken);
        }
        return Err(e.into());
    }
    Profile::insert(&mut *tx, &generate_id(), &user_id, name).await?;
    tx.commit().await.map_err(StoreError::from)?;

    info!(user_id = %user_id, email = %email, "user registered");
    Ok(Registered { user_id, token })
}

/// Checks credentials and returns the user with a fresh token.
/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn login(
    db: &SqlitePool,
    keys: &JwtKeys,
    email: &str,
    password: &str,
) -> Result<(User, String), AuthError> {
    let Some(user) = User::find_by_email(db, email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(AuthError::InvalidCredentials);
    };

    if !verify_password_async(password.to_owned(), user.password_hash.clone()).await? {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(AuthError::InvalidCredentials);
    }

    let token = keys.issue(&user.id)?;
    info!(user_id = %user.id, "user logged in");
    Ok((user, token))
}

/// Inserts the demo account unless its email is already taken.
/// Returns whether anything was written.
pub async fn seed_demo(db: &SqlitePool, hasher: &Hasher) -> Result<bool, AuthError> {
    let hash = hasher.hash_async(SEED_PASSWORD.to_owned()).await?;
    let user_id = generate_id();

    let mut tx = db.begin().await.map_err(StoreError::from)?;
    let created = User::insert_or_ignore(&mut *tx, &user_id, SEED_EMAIL, &hash).await?;
    if created {
        Profile::insert(&mut *tx, &generate_id(), &user_id, SEED_NAME).await?;
    }
    tx.commit().await.map_err(StoreError::from)?;

    info!(created, email = SEED_EMAIL, "seed applied");
    Ok(created)
}
