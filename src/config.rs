// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";
const DEFAULT_STRAVA_API_BASE_URL: &str = "https://www.strava.com/api/v3";
const DEFAULT_STRAVA_TIMEOUT_SECS: u64 = 15;
/// 10 MiB
const DEFAULT_MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend origin allowed by CORS
    pub frontend_url: String,
    /// Strava API base URL (overridable for tests)
    pub strava_api_base_url: String,
    /// Per-request timeout for Strava calls
    pub strava_timeout: Duration,
    /// Maximum accepted request body, in bytes
    pub max_file_size: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every variable is optional; unset ones take their defaults, but a
    /// value that is set and does not parse is an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            port: parse_var("PORT", DEFAULT_PORT)?,
            frontend_url: env::var("FRONTEND_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_FRONTEND_URL.to_string()),
            strava_api_base_url: env::var("STRAVA_API_BASE_URL")
                .map(|v| v.trim().to_string())
                .unwrap_or_else(|_| DEFAULT_STRAVA_API_BASE_URL.to_string()),
            strava_timeout: Duration::from_secs(parse_var(
                "STRAVA_TIMEOUT_SECS",
                DEFAULT_STRAVA_TIMEOUT_SECS,
            )?),
            max_file_size: parse_var("MAX_FILE_SIZE", DEFAULT_MAX_FILE_SIZE)?,
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            port: DEFAULT_PORT,
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            strava_api_base_url: "http://127.0.0.1:9".to_string(),
            strava_timeout: Duration::from_secs(5),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            value: value.clone(),
        }),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}
