//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid request timeout: {0}")]
    InvalidTimeout(&'static str),

    #[error("Invalid model API base URL")]
    InvalidBaseUrl,

    #[error("Model name cannot be empty")]
    EmptyModel,

    #[error("Maximum image dimension must be positive")]
    InvalidImageDimension,

    #[error("JPEG quality must be between 1 and 100")]
    InvalidJpegQuality,

    #[error("Attachment size limits must be positive")]
    InvalidAttachmentLimit,

    #[error("Maximum clarifying questions must be at least 1")]
    InvalidMaxQuestions,

    #[error("Assessment line limits must be positive")]
    InvalidLineLimit,
}
