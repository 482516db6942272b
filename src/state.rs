use crate::{
    auth::{jwt::JwtKeys, password::Hasher},
    config::AppConfig,
    db,
};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Everything a handler needs, built once and injected into the router.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub keys: JwtKeys,
    pub hasher: Hasher,
}

impl AppState {
    /// Reads the environment, opens the database and ensures the schema.
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        let db = db::connect(&config.database_url, config.database_max_connections).await?;
        db::init_schema(&db).await?;
        tracing::info!(database_url = %config.database_url, "database connected");
        Self::from_parts(db, config)
    }

    pub fn from_parts(db: SqlitePool, config: AppConfig) -> anyhow::Result<Self> {
        let keys = JwtKeys::from_config(&config.jwt);
        let hasher = Hasher::new(&config.password)?;
        Ok(Self {
            db,
            config: Arc::new(config),
            keys,
            hasher,
        })
    }

    /// Fresh in-memory database with the schema applied.
    pub async fn in_memory(config: AppConfig) -> anyhow::Result<Self> {
        let db = db::connect_in_memory().await?;
        db::init_schema(&db).await?;
        Self::from_parts(db, config)
    }
}
