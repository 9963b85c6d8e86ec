//! Binary Resource Port - readable attachments with a name and declared type.
//!
//! Every attachment source (raw uploads held in memory, files behind a URL)
//! implements [`BinaryResource`], so the normalizer handles them uniformly.
//! Remote sources reach the network through [`MediaFetcher`].

use async_trait::async_trait;
use std::fmt;

/// A named binary payload that can be read once per normalization.
#[async_trait]
pub trait BinaryResource: Send + Sync + fmt::Debug {
    /// File name as supplied by the owner, used for MIME inference and
    /// placeholder text.
    fn name(&self) -> &str;

    /// Declared type, either a MIME type ("image/png") or a coarse kind
    /// ("image", "text", "file"). `None` means infer from the name.
    fn declared_type(&self) -> Option<&str>;

    /// Reads the full payload.
    async fn read(&self) -> Result<Vec<u8>, MediaError>;
}

/// Port for retrieving a payload from a locator such as a URL.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    async fn fetch(&self, locator: &str) -> Result<Vec<u8>, MediaError>;
}

/// Media errors. These never leave the normalizer; they become placeholder
/// text or a dropped item.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MediaError {
    /// Transport failure while fetching.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// Remote returned a non-success status.
    #[error("fetch of {locator} returned status {status}")]
    Status { locator: String, status: u16 },

    /// Fetch or read exceeded its time bound.
    #[error("fetch timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Payload is larger than the configured bound.
    #[error("payload exceeds {limit_bytes} bytes")]
    TooLarge { limit_bytes: u64 },

    /// Payload could not be decoded (base64, image or text).
    #[error("decode failed: {0}")]
    Decode(String),

    /// Payload could not be re-encoded for transport.
    #[error("encode failed: {0}")]
    Encode(String),
}

impl MediaError {
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    pub fn encode(message: impl Into<String>) -> Self {
        Self::Encode(message.into())
    }
}
