//! In-memory upload - bytes the caller already holds.

use async_trait::async_trait;
use std::fmt;

use crate::ports::{BinaryResource, MediaError};

/// An uploaded file kept in memory.
#[derive(Clone, PartialEq, Eq)]
pub struct InMemoryUpload {
    name: String,
    declared_type: Option<String>,
    data: Vec<u8>,
}

impl InMemoryUpload {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            declared_type: None,
            data,
        }
    }

    /// Sets the declared type; blank values keep inference from the name.
    pub fn with_declared_type(mut self, declared_type: impl Into<String>) -> Self {
        let declared_type = declared_type.into();
        self.declared_type = if declared_type.trim().is_empty() {
            None
        } else {
            Some(declared_type)
        };
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Debug for InMemoryUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryUpload")
            .field("name", &self.name)
            .field("declared_type", &self.declared_type)
            .field("bytes", &self.data.len())
            .finish()
    }
}

#[async_trait]
impl BinaryResource for InMemoryUpload {
    fn name(&self) -> &str {
        &self.name
    }

    fn declared_type(&self) -> Option<&str> {
        self.declared_type.as_deref()
    }

    async fn read(&self) -> Result<Vec<u8>, MediaError> {
        Ok(self.data.clone())
    }
}
