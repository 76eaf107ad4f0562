//! services/api/src/config.rs
//!
//! Defines the service's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use swipe_feed_core::FeedConfig;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Which `ProfileSource` adapter backs the feeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProfileSourceKind {
    Postgres,
    Memory,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: Option<String>,
    pub log_level: Level,
    pub cors_origin: String,
    pub profile_source: ProfileSourceKind,
    pub seed_profiles_path: Option<PathBuf>,
    pub seed_placeholders: bool,
    pub feed: FeedConfig,
    /// Feed sessions unused for this long are dropped.
    pub session_idle_timeout: Duration,
    /// Upper bound on live feed sessions; the least recently used one is
    /// dropped to make room.
    pub max_sessions: usize,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key/value lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Server Settings ---
        let bind_address_str = lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_origin =
            lookup("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:8081".to_string());

        // --- Profile Source Settings ---
        let profile_source = match lookup("PROFILE_SOURCE").as_deref() {
            None | Some("postgres") => ProfileSourceKind::Postgres,
            Some("memory") => ProfileSourceKind::Memory,
            Some(other) => {
                return Err(ConfigError::InvalidValue(
                    "PROFILE_SOURCE".to_string(),
                    format!("'{}' is not one of postgres, memory", other),
                ))
            }
        };

        let database_url = lookup("DATABASE_URL");
        if profile_source == ProfileSourceKind::Postgres && database_url.is_none() {
            return Err(ConfigError::MissingVar("DATABASE_URL".to_string()));
        }

        let seed_profiles_path = lookup("SEED_PROFILES_PATH").map(PathBuf::from);
        let seed_placeholders = parse_or("FEED_SEED_PLACEHOLDERS", &lookup, false)?;

        // --- Feed Settings ---
        let defaults = FeedConfig::default();
        let feed = FeedConfig {
            page_size: parse_or("FEED_PAGE_SIZE", &lookup, defaults.page_size)?,
            low_water: parse_or("FEED_LOW_WATER", &lookup, defaults.low_water)?,
            visible_depth: parse_or("FEED_VISIBLE_DEPTH", &lookup, defaults.visible_depth)?,
        };
        if feed.page_size == 0 {
            return Err(ConfigError::InvalidValue(
                "FEED_PAGE_SIZE".to_string(),
                "page size must be at least 1".to_string(),
            ));
        }

        // --- Session Settings ---
        let session_idle_timeout =
            Duration::from_secs(parse_or("FEED_SESSION_IDLE_SECS", &lookup, 1800)?);
        let max_sessions = parse_or("FEED_MAX_SESSIONS", &lookup, 10_000)?;
        if max_sessions == 0 {
            return Err(ConfigError::InvalidValue(
                "FEED_MAX_SESSIONS".to_string(),
                "at least one session must be allowed".to_string(),
            ));
        }

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            cors_origin,
            profile_source,
            seed_profiles_path,
            seed_placeholders,
            feed,
            session_idle_timeout,
            max_sessions,
        })
    }
}

fn parse_or<T, F>(key: &str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(key.to_string(), e.to_string())),
    }
}
