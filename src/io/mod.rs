mod http;

pub use http::{DEFAULT_LISTING_URL, HttpClient};

use async_trait::async_trait;
use bytes::Bytes;

use crate::listing::FileDescriptor;

/// Outbound request failure, carrying the URL for logging.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {url} failed: {reason}")]
    RequestFailed { url: String, reason: String },

    #[error("request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("response from {url} could not be decoded: {reason}")]
    InvalidBody { url: String, reason: String },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            FetchError::RequestFailed { url, .. }
            | FetchError::Status { url, .. }
            | FetchError::InvalidBody { url, .. } => url,
        }
    }
}

/// Source of public folder listings.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch the listing behind `public_key`.
    ///
    /// A response without an item container is an empty listing, not an
    /// error.
    async fn fetch_listing(&self, public_key: &str) -> Result<Vec<FileDescriptor>, FetchError>;
}

/// Source of file contents by direct download URL.
#[async_trait]
pub trait FileSource: Send + Sync {
    async fn fetch_bytes(&self, download_url: &str) -> Result<Bytes, FetchError>;
}
