use std::env;
use std::fmt;

use actix_web::http::Uri;
use chrono::Duration;
use jsonwebtoken::Algorithm;

use crate::auth::token::{JwtSettings, DEFAULT_TOKEN_TTL_HOURS};

/// `DATABASE_URL` prefix that selects the in-memory store.
pub const MEMORY_DATABASE_URL: &str = "memory://";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(pub String);

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "configuration error: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub server_port: u16,
    pub server_host: String,
    pub jwt: JwtSettings,
    pub bcrypt_cost: u32,
    pub api_prefix: String,
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = required("JWT_SECRET")?;
        let algorithm_name = env::var("JWT_ALGORITHM").unwrap_or_else(|_| "HS256".to_string());
        let algorithm = JwtSettings::parse_algorithm(&algorithm_name).ok_or_else(|| {
            ConfigError(format!(
                "JWT_ALGORITHM must be one of HS256, HS384, HS512 (got {})",
                algorithm_name
            ))
        })?;
        let ttl_hours: i64 = parsed("TOKEN_TTL_HOURS", DEFAULT_TOKEN_TTL_HOURS)?;
        if ttl_hours <= 0 {
            return Err(ConfigError("TOKEN_TTL_HOURS must be positive".into()));
        }
        let ttl = Duration::try_hours(ttl_hours)
            .ok_or_else(|| ConfigError("TOKEN_TTL_HOURS is out of range".into()))?;

        let bcrypt_cost: u32 = parsed("BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError("BCRYPT_COST must be between 4 and 31".into()));
        }

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            max_connections: parsed("DATABASE_MAX_CONNECTIONS", 10)?,
            server_port: parsed("SERVER_PORT", 8080)?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            jwt: JwtSettings {
                secret: jwt_secret,
                algorithm,
                ttl,
            },
            bcrypt_cost,
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
            cors_origins: cors_origins(
                &env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:3000".to_string()),
            )?,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url.starts_with(MEMORY_DATABASE_URL)
    }

    pub fn algorithm(&self) -> Algorithm {
        self.jwt.algorithm
    }
}

fn required(key: &str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError(format!("{} must be set", key))),
    }
}

/// Splits a comma list of origins. Each one must be a `scheme://host[:port]` URI;
/// a wildcard cannot be combined with credentialed CORS.
fn cors_origins(raw: &str) -> Result<Vec<String>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            let invalid = || ConfigError(format!("CORS_ORIGINS entry {:?} is not an origin", origin));
            if origin == "*" {
                return Err(invalid());
            }
            let uri: Uri = origin.parse().map_err(|_| invalid())?;
            match (uri.scheme(), uri.authority()) {
                (Some(_), Some(_)) => Ok(origin.to_string()),
                _ => Err(invalid()),
            }
        })
        .collect()
}

fn parsed<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError(format!("{} must be a valid number", key))),
        Err(_) => Ok(default),
    }
}
