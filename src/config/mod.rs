//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `PETCARE` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use petcare_consult::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Using model {}", config.ai.model);
//! ```

mod ai;
mod consultation;
mod error;
mod media;

pub use ai::{AiConfig, LEGACY_API_KEY_VAR};
pub use consultation::ConsultationConfig;
pub use error::{ConfigError, ValidationError};
pub use media::MediaConfig;

use secrecy::Secret;
use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults except the provider API key, which
/// [`AppConfig::validate()`] requires.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Model provider configuration (Gemini)
    #[serde(default)]
    pub ai: AiConfig,

    /// Attachment fetch and image normalization bounds
    #[serde(default)]
    pub media: MediaConfig,

    /// Question budget and assessment format
    #[serde(default)]
    pub consultation: ConsultationConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `PETCARE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Falls back to `GEMINI_API_KEY` when no prefixed key is set
    ///
    /// # Environment Variable Format
    ///
    /// - `PETCARE__AI__GEMINI_API_KEY=...` -> `ai.gemini_api_key = ...`
    /// - `PETCARE__MEDIA__JPEG_QUALITY=90` -> `media.jpeg_quality = 90`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let mut config: Self = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PETCARE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        if config.ai.api_key().is_none() {
            if let Ok(key) = std::env::var(LEGACY_API_KEY_VAR) {
                config.ai.gemini_api_key = Some(Secret::new(key));
            }
        }

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid,
    /// including a missing API key.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ai.validate()?;
        self.media.validate()?;
        self.consultation.validate()?;
        Ok(())
    }

    /// Load and validate in one step, as the binary does at startup
    pub fn load_validated() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }
}
