//! HTTP front-end: routes, shared state, pages.

pub mod error;
pub mod handlers;
pub mod pages;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::cache::ListingCache;
use crate::io::{FileSource, HttpClient};
use crate::service::ListingService;
use pages::Pages;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub listings: Arc<ListingService>,
    pub files: Arc<dyn FileSource>,
    pub pages: Arc<Pages>,
}

impl AppState {
    /// Wire one HTTP client in as both listing and file source.
    pub fn new(client: HttpClient, cache: Arc<ListingCache>) -> tera::Result<Self> {
        let client = Arc::new(client);
        Ok(Self {
            listings: Arc::new(ListingService::new(client.clone(), cache)),
            files: client,
            pages: Arc::new(Pages::new()?),
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index).post(handlers::list_files))
        .route("/download", post(handlers::download))
        .route("/healthz", get(handlers::healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
