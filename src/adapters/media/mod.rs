//! Media Adapters.
//!
//! Implementations of the BinaryResource and MediaFetcher ports.
//!
//! ## Available Adapters
//!
//! - `InMemoryUpload` - Raw uploaded bytes with name and declared type
//! - `RemoteFile` - A file link resolved through a `MediaFetcher`
//! - `HttpMediaFetcher` - Bounded HTTP GET via reqwest

mod http_fetcher;
mod remote_file;
mod upload;

pub use http_fetcher::{HttpMediaFetcher, DEFAULT_MAX_MEDIA_BYTES, DEFAULT_MEDIA_FETCH_TIMEOUT};
pub use remote_file::RemoteFile;
pub use upload::InMemoryUpload;
