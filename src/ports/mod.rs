//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the consultation domain and the outside world. Adapters implement them.
//!
//! - `ModelGateway` - the generative model provider
//! - `BinaryResource` - an attachment with a name and declared type
//! - `MediaFetcher` - retrieval of remote attachment payloads

mod binary_resource;
mod model_gateway;

pub use binary_resource::{BinaryResource, MediaError, MediaFetcher};
pub use model_gateway::{ModelGateway, ProviderError, ProviderInfo};
