use crate::core::{AppError, Result};
use serde::Deserialize;
use std::env;

pub mod database;

pub use database::DatabaseConfig;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub square: SquareConfig,
    pub database: DatabaseConfig,
}

/// Square API connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct SquareConfig {
    pub access_token: String,
    pub location_id: String,
    pub base_url: String,
    pub webhook_signature_key: String,
    pub webhook_notification_url: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            square: SquareConfig {
                access_token: env::var("SQUARE_ACCESS_TOKEN").map_err(|_| {
                    AppError::Configuration("SQUARE_ACCESS_TOKEN not set".to_string())
                })?,
                location_id: env::var("SQUARE_LOCATION_ID").map_err(|_| {
                    AppError::Configuration("SQUARE_LOCATION_ID not set".to_string())
                })?,
                base_url: env::var("SQUARE_BASE_URL")
                    .unwrap_or_else(|_| "https://connect.squareupsandbox.com".to_string()),
                webhook_signature_key: env::var("SQUARE_WEBHOOK_SIGNATURE_KEY")
                    .unwrap_or_default(),
                webhook_notification_url: env::var("SQUARE_WEBHOOK_NOTIFICATION_URL")
                    .unwrap_or_default(),
            },
            database: DatabaseConfig::from_env()?,
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.square.access_token.trim().is_empty() {
            return Err(AppError::Configuration(
                "Square access token cannot be empty".to_string(),
            ));
        }

        if self.square.location_id.trim().is_empty() {
            return Err(AppError::Configuration(
                "Square location ID cannot be empty".to_string(),
            ));
        }

        if !self.square.base_url.starts_with("https://") {
            return Err(AppError::Configuration(
                "Square base URL must use https".to_string(),
            ));
        }

        Ok(())
    }
}
