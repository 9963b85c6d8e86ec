//! HTTP Media Fetcher - retrieves remote attachments over HTTP(S).
//!
//! Bodies are read chunk by chunk and abandoned as soon as they pass the
//! size bound, so a large or endless response never sits in memory whole.

use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;

use crate::ports::{MediaError, MediaFetcher};

/// Default bound on one remote fetch.
pub const DEFAULT_MEDIA_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Default bound on one remote body, in bytes.
pub const DEFAULT_MAX_MEDIA_BYTES: u64 = 20 * 1024 * 1024;

/// Fetches file links with a bounded GET.
#[derive(Debug, Clone)]
pub struct HttpMediaFetcher {
    client: Client,
    timeout: Duration,
    max_bytes: u64,
}

impl HttpMediaFetcher {
    pub fn new(timeout: Duration) -> Result<Self, MediaError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MediaError::fetch(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            timeout,
            max_bytes: DEFAULT_MAX_MEDIA_BYTES,
        })
    }

    /// Sets the largest body accepted.
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    fn transport_error(&self, err: reqwest::Error) -> MediaError {
        if err.is_timeout() {
            MediaError::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            MediaError::fetch(err.to_string())
        }
    }

    async fn read_bounded(&self, mut response: Response) -> Result<Vec<u8>, MediaError> {
        let too_large = MediaError::TooLarge {
            limit_bytes: self.max_bytes,
        };
        if response
            .content_length()
            .map_or(false, |length| length > self.max_bytes)
        {
            return Err(too_large);
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| self.transport_error(e))?
        {
            if (body.len() + chunk.len()) as u64 > self.max_bytes {
                return Err(too_large);
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

#[async_trait]
impl MediaFetcher for HttpMediaFetcher {
    async fn fetch(&self, locator: &str) -> Result<Vec<u8>, MediaError> {
        let response = self
            .client
            .get(locator)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MediaError::Status {
                locator: locator.to_string(),
                status: status.as_u16(),
            });
        }

        self.read_bounded(response).await
    }
}
