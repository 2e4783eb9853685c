use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::{Datelike, Utc};
use thiserror::Error;
use tracing::Level;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Runtime configuration, read from the environment (and `.env`)
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub db_max_connections: u32,
    /// Directory served under `/static`
    pub static_root: PathBuf,
    /// Meeting year abstracts are currently accepted for
    pub abstract_year: i32,
    pub log_level: Level,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        Ok(Self {
            database_url,
            bind_addr: parse_or(get("BIND_ADDR"), "BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)))?,
            db_max_connections: parse_or(get("DB_MAX_CONNECTIONS"), "DB_MAX_CONNECTIONS", 5)?,
            static_root: get("STATIC_ROOT").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("static")),
            abstract_year: parse_or(get("ABSTRACT_YEAR"), "ABSTRACT_YEAR", Utc::now().year())?,
            log_level: parse_or(get("LOG_LEVEL"), "LOG_LEVEL", Level::INFO)?,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(default),
    }
}
