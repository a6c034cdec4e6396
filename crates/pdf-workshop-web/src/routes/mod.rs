//! HTTP route handlers for the PDF workshop.
//!
//! All routes answer with JSON, except `fetch` which streams the stored PDF.
//! Failures use the `{ "error": message }` shape from [`crate::helpers`].
//!
//! Status codes:
//! - 400 for an upload with no `pdf` field or without the PDF signature
//! - 404 for an id with no stored document, never 500, on fetch and on the move,
//!   remove, merge and compress routes
//! - 500 for everything else, including bad page indices and optimizer failures

mod compress;
mod fetch;
mod merge;
mod pages;
mod upload;

pub use compress::compress_pdf;
pub use fetch::fetch_pdf;
pub use merge::merge_pdfs;
pub use pages::{move_page, remove_page};
pub use upload::upload_pdf;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Body of a successful upload.
#[derive(Serialize)]
pub struct UploadResponse {
    pub id: String,
}

/// Body of a successful edit or compression.
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of a successful merge.
#[derive(Serialize)]
pub struct MergeResponse {
    pub message: String,
    /// Identifier of the new document
    pub id: String,
}

/// Build the application router with its middleware stack.
pub fn router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.storage.max_upload_bytes;

    Router::new()
        .route("/upload", post(upload_pdf))
        .route("/fetch/{id}", get(fetch_pdf))
        .route("/movePage/{id}", post(move_page))
        .route("/removePage/{id}", post(remove_page))
        .route("/mergePDF", post(merge_pdfs))
        .route("/compressPDF/{id}", post(compress_pdf))
        // Middleware
        .layer(CompressionLayer::new())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
