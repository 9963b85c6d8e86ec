//! Model Gateway Adapters.
//!
//! Implementations of the ModelGateway port.
//!
//! ## Available Adapters
//!
//! - `GeminiGateway` - Google Gemini via the generateContent REST API
//! - `MockModelGateway` - Configurable mock for testing

mod gemini_gateway;
mod mock_gateway;

pub use gemini_gateway::{
    GeminiConfig, GeminiGateway, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL,
};
pub use mock_gateway::{MockModelGateway, DEFAULT_MOCK_REPLY};
