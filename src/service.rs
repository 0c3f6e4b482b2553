//! The listing and download pipelines, independent of the web layer.

use bytes::Bytes;
use std::sync::Arc;
use tracing::{error, info};

use crate::cache::ListingCache;
use crate::error::{Error, Result};
use crate::io::{FileSource, ListingSource};
use crate::listing::{self, FileDescriptor};
use crate::zip;

/// Separator between filename and URL in a submitted selection.
pub const SELECTION_SEPARATOR: &str = "||";

/// One file the client asked to download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionItem {
    pub filename: String,
    pub download_url: String,
}

impl SelectionItem {
    /// Parse a `"<filename>||<downloadUrl>"` token.
    ///
    /// The token splits at the last separator, so a filename may itself
    /// contain `||`; the URL may not.
    pub fn parse(token: &str) -> Result<Self> {
        match token.rsplit_once(SELECTION_SEPARATOR) {
            Some((filename, url)) if !filename.is_empty() && !url.is_empty() => Ok(Self {
                filename: filename.to_string(),
                download_url: url.to_string(),
            }),
            _ => Err(Error::InvalidSelection(token.to_string())),
        }
    }
}

/// Parse every token up front so a bad one fails before anything is fetched.
pub fn parse_selection<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<SelectionItem>> {
    if tokens.is_empty() {
        return Err(Error::NothingSelected);
    }
    tokens.iter().map(|t| SelectionItem::parse(t.as_ref())).collect()
}

/// Resolves public links to listings through the cache.
pub struct ListingService {
    source: Arc<dyn ListingSource>,
    cache: Arc<ListingCache>,
}

impl ListingService {
    pub fn new(source: Arc<dyn ListingSource>, cache: Arc<ListingCache>) -> Self {
        Self { source, cache }
    }

    pub fn cache(&self) -> &ListingCache {
        &self.cache
    }

    /// Full listing for `public_key`, from the cache when possible.
    ///
    /// Only non-empty listings are cached: an empty one cannot be told apart
    /// from an invalid link, so it is fetched again next time.
    pub async fn resolve(&self, public_key: &str) -> Result<Arc<[FileDescriptor]>> {
        if let Some(items) = self.cache.get(public_key) {
            info!(public_key, items = items.len(), "listing served from cache");
            return Ok(items);
        }

        let items = self.source.fetch_listing(public_key).await.map_err(|e| {
            error!(public_key, error = %e, "listing fetch failed");
            Error::ListingFetchFailed {
                public_key: public_key.to_string(),
                reason: e.to_string(),
            }
        })?;

        if items.is_empty() {
            return Err(Error::ListingEmpty(public_key.to_string()));
        }

        let items: Arc<[FileDescriptor]> = items.into();
        self.cache.put(public_key, items.clone());
        info!(
            public_key,
            items = items.len(),
            cached = self.cache.len(),
            "listing fetched and cached"
        );

        Ok(items)
    }

    /// Resolve, then narrow to `kind` (the raw upstream tag).
    pub async fn list(&self, public_key: &str, kind: Option<&str>) -> Result<Vec<FileDescriptor>> {
        let items = self.resolve(public_key).await?;
        Ok(listing::filter(&items, kind))
    }
}

/// Fetch every selected file in order and bundle them into one archive.
///
/// The first failed fetch aborts the batch; no partial archive is produced.
pub async fn build_download(
    source: &dyn FileSource,
    selection: &[SelectionItem],
) -> Result<Vec<u8>> {
    if selection.is_empty() {
        return Err(Error::NothingSelected);
    }

    let mut fetched: Vec<(&str, Bytes)> = Vec::with_capacity(selection.len());
    for item in selection {
        let content = source.fetch_bytes(&item.download_url).await.map_err(|e| {
            error!(filename = %item.filename, url = %e.url(), error = %e, "file fetch failed");
            Error::FileFetchFailed {
                url: item.download_url.clone(),
                reason: e.to_string(),
            }
        })?;
        fetched.push((item.filename.as_str(), content));
    }

    let archive = zip::build_archive(&fetched)?;
    info!(files = fetched.len(), bytes = archive.len(), "archive assembled");

    Ok(archive)
}
