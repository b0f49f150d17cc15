//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development. The AI model/key variables are read
//! again on every settings-cache refresh (see `adapters::settings`), so only
//! the infrastructure endpoints live here.

use std::net::SocketAddr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub log_level: Level,
    /// Base URL of the generateContent-compatible generative-model API.
    pub genai_base_url: String,
    /// Base URL of the storage/auth service (supabase-compatible REST).
    pub storage_url: String,
    pub storage_service_key: String,
    pub auth_api_key: String,
    /// Base URL of the IP-geolocation service.
    pub geo_api_url: String,
    pub allowed_origin: String,
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

        // --- Load Server and Database Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingVar("DATABASE_URL".to_string()))?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load External-Service Endpoints ---
        let genai_base_url = std::env::var("GENAI_BASE_URL").unwrap_or_else(|_| {
            "https://generativelanguage.googleapis.com/v1beta".to_string()
        });

        let storage_url = std::env::var("STORAGE_URL")
            .map_err(|_| ConfigError::MissingVar("STORAGE_URL".to_string()))?;
        let storage_service_key = std::env::var("STORAGE_SERVICE_KEY")
            .map_err(|_| ConfigError::MissingVar("STORAGE_SERVICE_KEY".to_string()))?;
        let auth_api_key = std::env::var("AUTH_API_KEY").unwrap_or_default();

        let geo_api_url =
            std::env::var("GEO_API_URL").unwrap_or_else(|_| "https://ipapi.co".to_string());

        let allowed_origin = std::env::var("ALLOWED_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            genai_base_url,
            storage_url,
            storage_service_key,
            auth_api_key,
            geo_api_url,
            allowed_origin,
        })
    }
}
