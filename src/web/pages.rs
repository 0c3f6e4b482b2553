use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde::Serialize;
use tera::{Context, Tera};

use crate::listing::FileDescriptor;

const INDEX: &str = "index.html";
const ERROR: &str = "error.html";

/// One table row of the listing page.
#[derive(Debug, Serialize)]
struct FileRow<'a> {
    name: &'a str,
    kind: &'a str,
    size: Option<u64>,
    modified: &'a str,
    token: Option<String>,
}

impl<'a> From<&'a FileDescriptor> for FileRow<'a> {
    fn from(file: &'a FileDescriptor) -> Self {
        Self {
            name: &file.name,
            kind: file.kind.as_str(),
            size: file.size,
            modified: file.modified.as_deref().unwrap_or_default(),
            token: file.selection_token(),
        }
    }
}

/// What the listing page shows.
#[derive(Debug, Default)]
pub struct IndexView<'a> {
    pub public_key: &'a str,
    pub filter_type: &'a str,
    pub files: &'a [FileDescriptor],
    pub error_message: Option<&'a str>,
}

/// HTML pages, compiled once at startup. Output is autoescaped.
pub struct Pages {
    tera: Tera,
}

impl Pages {
    pub fn new() -> tera::Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (INDEX, include_str!("../../templates/index.html")),
            (ERROR, include_str!("../../templates/error.html")),
        ])?;
        Ok(Self { tera })
    }

    pub fn index(&self, view: &IndexView<'_>) -> Response {
        let rows: Vec<FileRow<'_>> = view.files.iter().map(FileRow::from).collect();

        let mut ctx = Context::new();
        ctx.insert("public_key", view.public_key);
        ctx.insert("filter_type", view.filter_type);
        ctx.insert("files", &rows);
        ctx.insert("error_message", &view.error_message);

        self.render(INDEX, &ctx, StatusCode::OK)
    }

    pub fn error(&self, status: StatusCode, message: &str) -> Response {
        let mut ctx = Context::new();
        ctx.insert("status", &status.as_u16());
        ctx.insert("error_message", message);

        self.render(ERROR, &ctx, status)
    }

    fn render(&self, template: &str, ctx: &Context, status: StatusCode) -> Response {
        match self.tera.render(template, ctx) {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                tracing::error!(template, error = ?e, "template rendering failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "template rendering failed").into_response()
            }
        }
    }
}
