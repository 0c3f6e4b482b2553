use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use axum::Form;
use serde::Deserialize;
use url::form_urlencoded;

use super::error::{self, MISSING_PUBLIC_KEY};
use super::pages::IndexView;
use super::AppState;
use crate::service::{build_download, parse_selection};

/// Form field carrying one `"<filename>||<url>"` token per selected file.
const SELECTED_FILES: &str = "selected_files";

#[derive(Debug, Default, Deserialize)]
pub struct ListingForm {
    #[serde(default)]
    pub public_key: Option<String>,
    #[serde(default)]
    pub filter_type: Option<String>,
}

/// GET / : empty selection page.
pub async fn index(State(state): State<AppState>) -> Response {
    state.pages.index(&IndexView::default())
}

/// POST / : list the folder behind `public_key`, optionally filtered.
pub async fn list_files(State(state): State<AppState>, Form(form): Form<ListingForm>) -> Response {
    let filter_type = form.filter_type.as_deref().unwrap_or_default();
    let public_key = match form.public_key.as_deref() {
        Some(key) if !key.trim().is_empty() => key,
        _ => {
            return state.pages.index(&IndexView {
                filter_type,
                error_message: Some(MISSING_PUBLIC_KEY),
                ..IndexView::default()
            });
        }
    };

    match state.listings.list(public_key, Some(filter_type)).await {
        Ok(files) => state.pages.index(&IndexView {
            public_key,
            filter_type,
            files: &files,
            error_message: None,
        }),
        Err(e) => {
            let (_, message) = error::describe(&e);
            tracing::warn!(public_key, error = %e, "listing unavailable");
            state.pages.index(&IndexView {
                public_key,
                filter_type,
                error_message: Some(&message),
                ..IndexView::default()
            })
        }
    }
}

/// POST /download : fetch the selected files and return them as one zip.
///
/// Takes the raw body because `selected_files` repeats.
pub async fn download(State(state): State<AppState>, body: Bytes) -> Response {
    let tokens: Vec<String> = form_urlencoded::parse(&body)
        .filter(|(key, _)| key == SELECTED_FILES)
        .map(|(_, value)| value.into_owned())
        .collect();

    let result = match parse_selection(&tokens) {
        Ok(selection) => build_download(state.files.as_ref(), &selection).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(archive) => (
            [
                (CONTENT_TYPE, "application/zip"),
                (CONTENT_DISPOSITION, "attachment; filename=\"archive.zip\""),
            ],
            archive,
        )
            .into_response(),
        Err(e) => {
            let (status, message) = error::describe(&e);
            tracing::warn!(status = status.as_u16(), error = %e, "download rejected");
            state.pages.error(status, &message)
        }
    }
}

/// GET /healthz
pub async fn healthz() -> &'static str {
    "ok"
}
