//! Unified Application Configuration
//!
//! Centralized configuration for the process, loaded from environment
//! variables with validated defaults.

use bootgate_core::ErrorBehavior;
use serde::{Deserialize, Serialize};

/// Unified application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Bootstrap pipeline configuration
    pub bootstrap: BootstrapConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn load() -> Result<Self> {
        let config = Self::from_env()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server: ServerConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
            bootstrap: BootstrapConfig::from_env()?,
        })
    }

    pub fn validate(&self) -> Result<()> {
        self.logging.validate()?;
        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("BOOTGATE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = std::env::var("BOOTGATE_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidValue("BOOTGATE_PORT".to_string()))?;

        Ok(Self { host, port })
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,

    /// Log format ("text" or "json")
    pub format: String,
}

impl LoggingConfig {
    pub fn from_env() -> Result<Self> {
        let level = std::env::var("BOOTGATE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let format = std::env::var("BOOTGATE_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        Ok(Self { level, format })
    }

    pub fn validate(&self) -> Result<()> {
        if !matches!(self.format.as_str(), "text" | "json") {
            return Err(ConfigError::InvalidValue(
                "log format must be 'text' or 'json'".to_string(),
            ));
        }
        Ok(())
    }
}

/// Bootstrap pipeline configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BootstrapConfig {
    /// Reaction to a failed bootstrap
    pub error_behavior: ErrorBehavior,
}

impl BootstrapConfig {
    pub fn from_env() -> Result<Self> {
        let raw = std::env::var("BOOTGATE_ON_ERROR").unwrap_or_else(|_| "exit".to_string());

        let error_behavior = match raw.to_lowercase().as_str() {
            "exit" | "exit_on_error" | "exit-on-error" => ErrorBehavior::ExitOnError,
            "continue" => ErrorBehavior::Continue,
            _ => return Err(ConfigError::InvalidValue("BOOTGATE_ON_ERROR".to_string())),
        };

        Ok(Self { error_behavior })
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
