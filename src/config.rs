//! Application configuration loaded from environment variables.
//!
//! Everything has a sensible local-development default; the only things
//! worth overriding in production are the MongoDB URI and the port.

use std::env;

/// Default refresh interval: 6 hours.
const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 6 * 60 * 60;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// MongoDB connection string
    pub mongodb_uri: String,
    /// MongoDB database name
    pub database_name: String,
    /// Server port
    pub port: u16,
    /// OpenF1 API base URL (sessions, drivers)
    pub openf1_base_url: String,
    /// Ergast-compatible API base URL (results, standings)
    pub ergast_base_url: String,
    /// Season to ingest from the Ergast API
    pub season: String,
    /// Seconds between automatic refresh cycles
    pub refresh_interval_secs: u64,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            database_name: "formula1_test".to_string(),
            port: 8000,
            openf1_base_url: "https://api.openf1.org/v1".to_string(),
            ergast_base_url: "https://api.jolpi.ca/ergast/f1".to_string(),
            season: "2025".to_string(),
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            mongodb_uri: env::var("MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            database_name: env::var("DATABASE_NAME").unwrap_or_else(|_| "formula1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT"))?,
            openf1_base_url: env::var("OPENF1_BASE_URL")
                .unwrap_or_else(|_| "https://api.openf1.org/v1".to_string()),
            ergast_base_url: env::var("ERGAST_BASE_URL")
                .unwrap_or_else(|_| "https://api.jolpi.ca/ergast/f1".to_string()),
            season: env::var("SEASON").unwrap_or_else(|_| "2025".to_string()),
            refresh_interval_secs: env::var("REFRESH_INTERVAL_SECS")
                .unwrap_or_else(|_| DEFAULT_REFRESH_INTERVAL_SECS.to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("REFRESH_INTERVAL_SECS"))?,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
