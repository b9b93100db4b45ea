// src/config/env.rs
// DOCUMENTATION: Environment variable management
// PURPOSE: Load and validate configuration from .env files

use dotenv::dotenv;
use std::env;

/// Application configuration loaded from environment variables
/// DOCUMENTATION: Centralizes all configuration in one struct
/// Load with Config::from_env() at application startup
///
/// The Places API key lives here and is passed into the client
/// constructors explicitly, never read from ambient state.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "127.0.0.1")
    pub server_address: String,

    /// Server listen port (default 8002)
    pub server_port: u16,

    /// Environment: development, staging, production
    pub environment: String,

    /// Log level: debug, info, warn, error
    pub log_level: String,

    /// Google Places API key
    pub places_api_key: String,

    /// Alternate Places API base URL (tests, proxies); None = live API
    pub places_base_url: Option<String>,

    /// Alternate translation base URL; None = live endpoint
    pub translate_base_url: Option<String>,

    /// Login username for the gated surface (empty = gating disabled)
    pub auth_username: String,

    /// Login password for the gated surface
    pub auth_password: String,

    /// Access token handed out on successful login and required by
    /// gated search endpoints via the X-Access-Token header
    pub access_token: String,
}

impl Config {
    /// Load configuration from environment variables
    /// DOCUMENTATION: Reads from .env or process environment
    /// Called once at application startup
    pub fn from_env() -> Self {
        // Load .env file if it exists
        dotenv().ok();

        Config {
            server_address: env::var("SERVER_ADDRESS").unwrap_or_else(|_| "127.0.0.1".to_string()),

            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8002".to_string())
                .parse()
                .unwrap_or(8002),

            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),

            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            places_api_key: env::var("PLACES_API_KEY").unwrap_or_else(|_| String::new()),

            places_base_url: env::var("PLACES_BASE_URL").ok().filter(|v| !v.is_empty()),

            translate_base_url: env::var("TRANSLATE_BASE_URL").ok().filter(|v| !v.is_empty()),

            auth_username: env::var("AUTH_USERNAME").unwrap_or_else(|_| String::new()),

            auth_password: env::var("AUTH_PASSWORD").unwrap_or_else(|_| String::new()),

            access_token: env::var("ACCESS_TOKEN").unwrap_or_else(|_| "access-token-dev".to_string()),
        }
    }

    /// Whether search endpoints require a login first
    pub fn gated(&self) -> bool {
        !self.auth_username.is_empty()
    }

    /// Validate critical configuration
    /// DOCUMENTATION: Ensures application can start safely
    pub fn validate(&self) -> Result<(), String> {
        if self.places_api_key.is_empty() {
            log::warn!("PLACES_API_KEY not configured - searches will be rejected");
        }

        if self.gated() && self.auth_password.is_empty() {
            return Err("AUTH_USERNAME is set but AUTH_PASSWORD is empty".to_string());
        }

        Ok(())
    }
}
