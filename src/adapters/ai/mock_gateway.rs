//! Mock Model Gateway for testing.
//!
//! Provides a configurable implementation of the ModelGateway port so the
//! consultation flow can run without calling a real provider.
//!
//! # Features
//!
//! - Pre-configured replies, consumed in order
//! - Error injection
//! - Simulated latency
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let gateway = MockModelGateway::new()
//!     .with_reply("How long has Max been off his food?")
//!     .with_error(ProviderError::rate_limited(30));
//!
//! let first = gateway.generate(&payload).await?;
//! assert_eq!(gateway.call_count(), 1);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::consultation::ConversationPayload;
use crate::ports::{ModelGateway, ProviderError, ProviderInfo};

/// Reply returned once the configured queue is empty.
pub const DEFAULT_MOCK_REPLY: &str = "Mock reply";

/// Mock model gateway.
///
/// Clones share the reply queue and the call history.
#[derive(Debug, Clone)]
pub struct MockModelGateway {
    replies: Arc<Mutex<VecDeque<Result<String, ProviderError>>>>,
    info: ProviderInfo,
    delay: Duration,
    calls: Arc<Mutex<Vec<ConversationPayload>>>,
}

impl Default for MockModelGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockModelGateway {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            info: ProviderInfo::new("mock", "mock-model-1"),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues a successful reply.
    pub fn with_reply(self, text: impl Into<String>) -> Self {
        lock(&self.replies).push_back(Ok(text.into()));
        self
    }

    /// Queues a failure.
    pub fn with_error(self, error: ProviderError) -> Self {
        lock(&self.replies).push_back(Err(error));
        self
    }

    /// Sets simulated latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_provider_info(mut self, info: ProviderInfo) -> Self {
        self.info = info;
        self
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Payloads received so far, oldest first.
    pub fn calls(&self) -> Vec<ConversationPayload> {
        lock(&self.calls).clone()
    }

    pub fn last_call(&self) -> Option<ConversationPayload> {
        lock(&self.calls).last().cloned()
    }

    fn next_reply(&self) -> Result<String, ProviderError> {
        lock(&self.replies)
            .pop_front()
            .unwrap_or_else(|| Ok(DEFAULT_MOCK_REPLY.to_string()))
    }
}

#[async_trait]
impl ModelGateway for MockModelGateway {
    async fn generate(&self, payload: &ConversationPayload) -> Result<String, ProviderError> {
        lock(&self.calls).push(payload.clone());

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        self.next_reply()
    }

    fn provider_info(&self) -> ProviderInfo {
        self.info.clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
