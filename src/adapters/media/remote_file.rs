//! Remote File - a [`MediaReference`] read through a [`MediaFetcher`].

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::domain::consultation::MediaReference;
use crate::ports::{BinaryResource, MediaError, MediaFetcher};

/// Attachment whose bytes live behind a file link.
#[derive(Clone)]
pub struct RemoteFile {
    reference: MediaReference,
    fetcher: Arc<dyn MediaFetcher>,
}

impl RemoteFile {
    pub fn new(reference: MediaReference, fetcher: Arc<dyn MediaFetcher>) -> Self {
        Self { reference, fetcher }
    }

    pub fn reference(&self) -> &MediaReference {
        &self.reference
    }
}

impl fmt::Debug for RemoteFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteFile")
            .field("reference", &self.reference)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl BinaryResource for RemoteFile {
    fn name(&self) -> &str {
        &self.reference.name
    }

    fn declared_type(&self) -> Option<&str> {
        Some(self.reference.declared_type.as_str())
    }

    async fn read(&self) -> Result<Vec<u8>, MediaError> {
        self.fetcher.fetch(&self.reference.locator).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingFetcher {
        locators: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MediaFetcher for RecordingFetcher {
        async fn fetch(&self, locator: &str) -> Result<Vec<u8>, MediaError> {
            self.locators.lock().unwrap().push(locator.to_string());
            Ok(b"payload".to_vec())
        }
    }

    #[tokio::test]
    async fn reads_through_fetcher_with_locator() {
        let fetcher = Arc::new(RecordingFetcher::default());
        let file = RemoteFile::new(
            MediaReference::new("image", "https://files.example/rash.png", "rash.png"),
            fetcher.clone(),
        );

        assert_eq!(file.name(), "rash.png");
        assert_eq!(file.declared_type(), Some("image"));
        assert_eq!(file.read().await.unwrap(), b"payload".to_vec());
        assert_eq!(
            *fetcher.locators.lock().unwrap(),
            vec!["https://files.example/rash.png".to_string()]
        );
    }
}
