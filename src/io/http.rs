use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Response};
use std::time::Duration;

use super::{FetchError, FileSource, ListingSource};
use crate::listing::{self, FileDescriptor};

/// Public resources endpoint of the Yandex.Disk REST API.
pub const DEFAULT_LISTING_URL: &str = "https://cloud-api.yandex.net/v1/disk/public/resources";

/// reqwest-backed client for both the listing endpoint and file downloads.
///
/// Every call is a single attempt with the configured timeout.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    listing_url: String,
    listing_limit: u32,
}

impl HttpClient {
    pub fn new(
        listing_url: impl Into<String>,
        listing_limit: u32,
        timeout: Duration,
    ) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            listing_url: listing_url.into(),
            listing_limit,
        })
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<Response, FetchError> {
        let resp = request.send().await.map_err(|e| FetchError::RequestFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        if !resp.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: resp.status().as_u16(),
            });
        }

        Ok(resp)
    }
}

#[async_trait]
impl ListingSource for HttpClient {
    async fn fetch_listing(&self, public_key: &str) -> Result<Vec<FileDescriptor>, FetchError> {
        // reqwest form-encodes query values, so spaces become '+'
        let request = self
            .client
            .get(&self.listing_url)
            .query(&[("public_key", public_key)])
            .query(&[("limit", self.listing_limit)]);

        let resp = self.send(request, &self.listing_url).await?;
        let body = resp.bytes().await.map_err(|e| FetchError::RequestFailed {
            url: self.listing_url.clone(),
            reason: e.to_string(),
        })?;

        match listing::parse_listing(&body) {
            Ok(Some(items)) => Ok(items),
            Ok(None) => {
                tracing::warn!(public_key, "no items found in listing response");
                Ok(Vec::new())
            }
            Err(e) => Err(FetchError::InvalidBody {
                url: self.listing_url.clone(),
                reason: e.to_string(),
            }),
        }
    }
}

#[async_trait]
impl FileSource for HttpClient {
    async fn fetch_bytes(&self, download_url: &str) -> Result<Bytes, FetchError> {
        let resp = self.send(self.client.get(download_url), download_url).await?;

        resp.bytes().await.map_err(|e| FetchError::RequestFailed {
            url: download_url.to_string(),
            reason: e.to_string(),
        })
    }
}
