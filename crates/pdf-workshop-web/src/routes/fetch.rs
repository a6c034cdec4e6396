//! Fetch route - stored bytes as-is.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{StatusCode, header},
    response::Response,
};
use std::sync::Arc;

use crate::helpers::{ResultExt, RouteResult};
use crate::state::AppState;

/// Return the stored document, unmodified.
pub async fn fetch_pdf(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> RouteResult<Response> {
    let bytes = state.workshop.fetch(&id).await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(header::CACHE_CONTROL, "no-store")
        .body(Body::from(bytes))
        .or_internal_error()
}
