use crate::zip::ArchiveError;

/// Errors surfaced by the listing and download pipelines.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not fetch listing for {public_key}: {reason}")]
    ListingFetchFailed { public_key: String, reason: String },

    #[error("no items found for {0}")]
    ListingEmpty(String),

    #[error("failed to fetch {url}: {reason}")]
    FileFetchFailed { url: String, reason: String },

    #[error("failed to assemble archive: {0}")]
    ArchiveAssemblyFailed(#[from] ArchiveError),

    #[error("no file selected for download")]
    NothingSelected,

    #[error("invalid selection {0:?}: expected \"<filename>||<url>\"")]
    InvalidSelection(String),
}

pub type Result<T> = std::result::Result<T, Error>;
