//! Media normalization configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::consultation::{
    ImageLimits, NormalizerConfig, DEFAULT_MAX_ATTACHMENT_BYTES, DEFAULT_MAX_TEXT_CHARS,
};

/// Bounds applied to attachments
#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    /// Timeout for one remote fetch, in seconds
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    /// Longest image side after normalization, in pixels
    #[serde(default = "default_max_image_dimension")]
    pub max_image_dimension: u32,

    /// JPEG re-encoding quality
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,

    /// Largest attachment read or fetched, in bytes
    #[serde(default = "default_max_attachment_bytes")]
    pub max_attachment_bytes: usize,

    /// Characters kept from one text attachment
    #[serde(default = "default_max_text_chars")]
    pub max_text_chars: usize,
}

impl MediaConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn image_limits(&self) -> ImageLimits {
        ImageLimits {
            max_dimension: self.max_image_dimension,
            jpeg_quality: self.jpeg_quality,
        }
    }

    /// Settings for the message normalizer
    pub fn normalizer_config(&self) -> NormalizerConfig {
        NormalizerConfig {
            fetch_timeout: self.fetch_timeout(),
            image_limits: self.image_limits(),
            max_attachment_bytes: self.max_attachment_bytes,
            max_text_chars: self.max_text_chars,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.fetch_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("media.fetch_timeout_secs"));
        }
        if self.max_image_dimension == 0 {
            return Err(ValidationError::InvalidImageDimension);
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ValidationError::InvalidJpegQuality);
        }
        if self.max_attachment_bytes == 0 || self.max_text_chars == 0 {
            return Err(ValidationError::InvalidAttachmentLimit);
        }
        Ok(())
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: default_fetch_timeout(),
            max_image_dimension: default_max_image_dimension(),
            jpeg_quality: default_jpeg_quality(),
            max_attachment_bytes: default_max_attachment_bytes(),
            max_text_chars: default_max_text_chars(),
        }
    }
}

fn default_fetch_timeout() -> u64 {
    10
}

fn default_max_image_dimension() -> u32 {
    1024
}

fn default_jpeg_quality() -> u8 {
    85
}

fn default_max_attachment_bytes() -> usize {
    DEFAULT_MAX_ATTACHMENT_BYTES
}

fn default_max_text_chars() -> usize {
    DEFAULT_MAX_TEXT_CHARS
}
