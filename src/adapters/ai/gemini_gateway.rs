//! Gemini Gateway - Implementation of ModelGateway for Google's Gemini API.
//!
//! Sends the whole assembled conversation to `models/{model}:generateContent`
//! and returns the first text of the first candidate.
//!
//! # Configuration
//!
//! ```ignore
//! let config = GeminiConfig::new(api_key)
//!     .with_model("gemini-1.5-flash")
//!     .with_timeout(Duration::from_secs(30));
//!
//! let gateway = GeminiGateway::new(config)?;
//! ```
//!
//! # Retries
//!
//! None. One failed attempt is reported as a [`ProviderError`] and the
//! application layer answers with its fallback text.

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::consultation::{ConversationPayload, Part, Role, Turn};
use crate::ports::{ModelGateway, ProviderError, ProviderInfo};

/// Default model.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-pro-latest";

/// Default API root.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Seconds to wait when a 429 carries no usable `retry-after`.
const DEFAULT_RETRY_AFTER_SECS: u32 = 30;

/// Configuration for the Gemini gateway.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (e.g., "gemini-1.5-pro-latest").
    pub model: String,
    /// API root, without the `models/` segment.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl GeminiConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Gemini API gateway.
pub struct GeminiGateway {
    config: GeminiConfig,
    client: Client,
}

impl GeminiGateway {
    /// Creates a gateway with its own HTTP client bounded by the timeout.
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    async fn send_request(&self, request: &GenerateContentRequest) -> Result<Response, ProviderError> {
        self.client
            .post(self.generate_url())
            .header("x-goog-api-key", self.config.api_key())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    ProviderError::network(format!("connection failed: {}", e))
                } else {
                    ProviderError::network(e.to_string())
                }
            })
    }

    /// Maps a non-success status to a provider error.
    async fn handle_response_status(response: Response) -> Result<Response, ProviderError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let retry_after = parse_retry_after(response.headers());
        let body = response.text().await.unwrap_or_default();
        Err(map_http_error(status, &body, retry_after))
    }

    async fn parse_response(response: Response) -> Result<String, ProviderError> {
        let response = Self::handle_response_status(response).await?;
        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::parse(format!("failed to parse response: {}", e)))?;
        extract_text(parsed)
    }
}

#[async_trait]
impl ModelGateway for GeminiGateway {
    async fn generate(&self, payload: &ConversationPayload) -> Result<String, ProviderError> {
        let request = GenerateContentRequest::from_payload(payload);
        let response = self.send_request(&request).await?;
        Self::parse_response(response).await
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("gemini", &self.config.model)
    }
}

fn map_http_error(status: StatusCode, body: &str, retry_after: Option<u32>) -> ProviderError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .ok()
        .map(|wrapper| match (wrapper.error.status, wrapper.error.message) {
            (Some(status), Some(message)) => format!("{}: {}", status, message),
            (None, Some(message)) => message,
            (Some(status), None) => status,
            (None, None) => body.to_string(),
        })
        .unwrap_or_else(|| body.to_string());

    match status.as_u16() {
        401 | 403 => ProviderError::AuthenticationFailed,
        400 if message.contains("API_KEY_INVALID") || message.contains("API key not valid") => {
            ProviderError::AuthenticationFailed
        }
        400 | 404 | 413 => ProviderError::InvalidRequest(message),
        429 => ProviderError::rate_limited(retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS)),
        500..=599 => ProviderError::unavailable(format!("server error {}: {}", status, message)),
        _ => ProviderError::network(format!("unexpected status {}: {}", status, message)),
    }
}

fn parse_retry_after(headers: &HeaderMap) -> Option<u32> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

fn extract_text(response: GenerateContentResponse) -> Result<String, ProviderError> {
    if let Some(reason) = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason)
    {
        return Err(ProviderError::content_filtered(reason));
    }

    let candidate = response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .ok_or(ProviderError::EmptyResponse)?;

    let text = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return match candidate.finish_reason.as_deref() {
            Some(reason @ ("SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT")) => {
                Err(ProviderError::content_filtered(reason))
            }
            _ => Err(ProviderError::EmptyResponse),
        };
    }

    Ok(text)
}

// ----- Gemini API Types -----

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// Maps payload blocks to contents.
    ///
    /// Adjacent blocks with the same role are merged into one content, since
    /// the API expects user and model contents to alternate. Empty text
    /// parts are rejected by the API, so they are left out; a block left
    /// with no parts is skipped.
    fn from_payload(payload: &ConversationPayload) -> Self {
        let mut contents: Vec<Content> = Vec::with_capacity(payload.len());
        for turn in payload.blocks() {
            let role = turn.role.as_str();
            let parts: Vec<WirePart> = wire_parts(turn)
                .into_iter()
                .filter(|part| !part.is_empty_text())
                .collect();
            if parts.is_empty() {
                continue;
            }
            match contents.last_mut() {
                Some(last) if last.role == role => last.parts.extend(parts),
                _ => contents.push(Content {
                    role: role.to_string(),
                    parts,
                }),
            }
        }
        Self { contents }
    }
}

fn wire_parts(turn: &Turn) -> Vec<WirePart> {
    turn.parts
        .iter()
        .map(|part| match part {
            Part::Text(text) => WirePart::Text { text: text.clone() },
            Part::Media(media) => WirePart::InlineData {
                inline_data: InlineData {
                    mime_type: media.mime_type.clone(),
                    data: media.to_base64(),
                },
            },
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<WirePart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum WirePart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

impl WirePart {
    fn is_empty_text(&self) -> bool {
        matches!(self, WirePart::Text { text } if text.trim().is_empty())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}
