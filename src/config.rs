use std::str::FromStr;

use anyhow::{bail, Context};

pub const DEV_JWT_SECRET: &str = "dev-secret";

/// Upper bound for `JWT_TTL_MINUTES` (ten years).
pub const MAX_JWT_TTL_MINUTES: i64 = 60 * 24 * 365 * 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// `None` keeps tokens time-unbounded.
    pub ttl_minutes: Option<i64>,
}

/// Argon2 work factor.
#[derive(Debug, Clone, Copy)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            host: "0.0.0.0".into(),
            port: 3001,
            database_url: "sqlite://database.db".into(),
            database_max_connections: 5,
            jwt: JwtConfig {
                secret: DEV_JWT_SECRET.into(),
                ttl_minutes: None,
            },
            password: PasswordConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source so it can be
    /// exercised without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let environment = match lookup("APP_ENV").as_deref().map(str::trim) {
            Some("production") | Some("prod") => Environment::Production,
            Some("development") | Some("dev") | Some("") | None => Environment::Development,
            Some(other) => bail!("APP_ENV must be `development` or `production`, got `{other}`"),
        };

        let secret = match lookup("JWT_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None if environment == Environment::Production => {
                bail!("JWT_SECRET must be set when APP_ENV=production")
            }
            None => {
                tracing::warn!("JWT_SECRET not set; falling back to the insecure development secret");
                DEV_JWT_SECRET.into()
            }
        };

        let port = match lookup("APP_PORT").or_else(|| lookup("PORT")) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("APP_PORT/PORT is not a valid port: `{raw}`"))?,
            None => defaults.port,
        };

        Ok(Self {
            environment,
            host: lookup("APP_HOST").unwrap_or(defaults.host),
            port,
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            database_max_connections: parse_or(
                &lookup,
                "DATABASE_MAX_CONNECTIONS",
                defaults.database_max_connections,
            )?,
            jwt: JwtConfig {
                secret,
                ttl_minutes: parse_ttl(&lookup)?,
            },
            password: PasswordConfig {
                memory_kib: parse_or(&lookup, "PASSWORD_MEMORY_KIB", defaults.password.memory_kib)?,
                iterations: parse_or(&lookup, "PASSWORD_ITERATIONS", defaults.password.iterations)?,
                parallelism: parse_or(
                    &lookup,
                    "PASSWORD_PARALLELISM",
                    defaults.password.parallelism,
                )?,
            },
        })
    }
}

fn parse_ttl<F>(lookup: &F) -> anyhow::Result<Option<i64>>
where
    F: Fn(&str) -> Option<String>,
{
    let ttl = parse_opt::<F, i64>(lookup, "JWT_TTL_MINUTES")?;
    if let Some(minutes) = ttl {
        if minutes > MAX_JWT_TTL_MINUTES {
            bail!("JWT_TTL_MINUTES must be at most {MAX_JWT_TTL_MINUTES}, got {minutes}");
        }
    }
    Ok(ttl)
}

fn parse_opt<F, T>(lookup: &F, key: &str) -> anyhow::Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .map(|v| {
            v.trim()
                .parse::<T>()
                .with_context(|| format!("{key} has an invalid value: `{v}`"))
        })
        .transpose()
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    Ok(parse_opt(lookup, key)?.unwrap_or(default))
}
