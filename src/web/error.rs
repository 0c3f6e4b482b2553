use axum::http::StatusCode;

use crate::error::Error;

/// Shown for any listing failure; an empty listing reads the same.
pub const LISTING_FAILED: &str = "Could not retrieve the file list. Check the link.";
pub const MISSING_PUBLIC_KEY: &str = "Please enter a public link.";
pub const NOTHING_SELECTED: &str = "No file selected for download.";

/// Status code and user-facing description for a pipeline error.
///
/// Listing failures render inline on the listing page, so they keep 200.
pub fn describe(err: &Error) -> (StatusCode, String) {
    match err {
        Error::NothingSelected => (StatusCode::BAD_REQUEST, NOTHING_SELECTED.to_string()),
        Error::InvalidSelection(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        Error::FileFetchFailed { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to download one of the files: {err}"),
        ),
        Error::ArchiveAssemblyFailed(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to assemble the archive.".to_string(),
        ),
        Error::ListingFetchFailed { .. } | Error::ListingEmpty(_) => {
            (StatusCode::OK, LISTING_FAILED.to_string())
        }
    }
}
