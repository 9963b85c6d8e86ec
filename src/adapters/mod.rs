//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Model gateways (Gemini, mock)
//! - `media` - Attachment sources and the HTTP fetcher
//! - `envelope` - JSON request/response envelopes of the batch entry point

pub mod ai;
pub mod envelope;
pub mod media;

pub use ai::{GeminiConfig, GeminiGateway, MockModelGateway};
pub use envelope::{ConsultRequestEnvelope, ConsultResponseEnvelope, EnvelopeError};
pub use media::{HttpMediaFetcher, InMemoryUpload, RemoteFile};
