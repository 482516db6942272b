use std::str::FromStr;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use thiserror::Error;

/// Errors surfaced by the credential store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A UNIQUE or PRIMARY KEY constraint rejected the write.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    #[error(transparent)]
    Database(sqlx::Error),
}

impl StoreError {
    /// True when the violated constraint is the one on `users.email`.
    pub fn is_duplicate_email(&self) -> bool {
        matches!(self, StoreError::ConstraintViolation(msg) if msg.contains("users.email"))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() || db_err.message().contains("UNIQUE constraint failed")
            {
                return StoreError::ConstraintViolation(db_err.message().to_string());
            }
        }
        StoreError::Database(err)
    }
}

const CREATE_USERS: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id            TEXT PRIMARY KEY,
        email         TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL
    )
"#;

const CREATE_USER_PROFILES: &str = r#"
    CREATE TABLE IF NOT EXISTS user_profiles (
        id      TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        name    TEXT NOT NULL
    )
"#;

const CREATE_PROFILES_USER_INDEX: &str = r#"
    CREATE INDEX IF NOT EXISTS idx_user_profiles_user_id ON user_profiles (user_id)
"#;

/// Opens a pool against `url`, creating the database file if needed.
pub async fn connect(url: &str, max_connections: u32) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)
        .with_context(|| format!("parse database url `{url}`"))?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .context("connect to database")?;
    Ok(pool)
}

/// A single-connection in-memory database. Every new connection to
/// `sqlite::memory:` sees a fresh database, so the one connection is never
/// recycled.
pub async fn connect_in_memory() -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .context("open in-memory database")?;
    Ok(pool)
}

/// Creates the tables if they are absent. Safe to run on every start.
pub async fn init_schema(pool: &SqlitePool) -> anyhow::Result<()> {
    for ddl in [CREATE_USERS, CREATE_USER_PROFILES, CREATE_PROFILES_USER_INDEX] {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .context("create schema")?;
    }
    tracing::debug!("schema ready");
    Ok(())
}
