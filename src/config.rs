// src/config.rs

use std::env;

use dotenvy::dotenv;
use thiserror::Error;
use url::Url;

const DEFAULT_GENERATOR_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_GENERATOR_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Settings for the external quiz generator. Absent when no API key is set.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres URL, or `memory` for the in-process store.
    pub database_url: String,
    pub jwt_secret: String,
    pub rust_log: String,
    pub bind_addr: String,
    pub request_timeout_secs: u64,
    pub db_acquire_timeout_secs: u64,
    pub auth_timeout_secs: u64,
    pub generator: Option<GeneratorConfig>,
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn seconds(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| ConfigError::Invalid {
                name,
                reason: format!("expected a positive number of seconds, got '{raw}'"),
            }),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET")?;

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());

        let generator = match env::var("GENERATOR_API_KEY") {
            Ok(api_key) if !api_key.is_empty() => {
                let base_url = env::var("GENERATOR_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_GENERATOR_BASE_URL.to_string());
                Url::parse(&base_url).map_err(|e| ConfigError::Invalid {
                    name: "GENERATOR_BASE_URL",
                    reason: e.to_string(),
                })?;
                Some(GeneratorConfig {
                    api_key,
                    base_url,
                    model: env::var("GENERATOR_MODEL")
                        .unwrap_or_else(|_| DEFAULT_GENERATOR_MODEL.to_string()),
                    timeout_secs: seconds("GENERATOR_TIMEOUT_SECS", 60)?,
                })
            }
            _ => None,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            rust_log,
            bind_addr,
            request_timeout_secs: seconds("REQUEST_TIMEOUT_SECS", 30)?,
            db_acquire_timeout_secs: seconds("DB_ACQUIRE_TIMEOUT_SECS", 3)?,
            auth_timeout_secs: seconds("AUTH_TIMEOUT_SECS", 5)?,
            generator,
        })
    }

    /// Whether to use the in-process store instead of Postgres.
    pub fn uses_memory_store(&self) -> bool {
        self.database_url == "memory"
    }
}
