//! Upload route - PDF file upload handling.

use axum::{Json, extract::State};
use axum_extra::extract::Multipart;
use axum_extra::extract::multipart::MultipartError;
use pdf_workshop_core::{ErrorKind, PendingUpload};
use std::sync::Arc;
use tracing::info;

use super::UploadResponse;
use crate::helpers::{ApiError, OptionExt, RouteResult};
use crate::state::AppState;

/// Multipart field carrying the document
const UPLOAD_FIELD: &str = "pdf";

/// Accept one PDF from the `pdf` multipart field and store it under a new id.
pub async fn upload_pdf(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> RouteResult<Json<UploadResponse>> {
    let mut upload = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let media_type = field.content_type().map(str::to_string);
        let filename = field.file_name().unwrap_or("document.pdf").to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;

        info!("Received {} ({} bytes)", filename, bytes.len());
        upload = Some(PendingUpload::new(bytes, media_type));
        break;
    }

    let upload = upload.or_bad_request("No file uploaded")?;

    let id = state.workshop.upload(upload).await.map_err(|e| {
        if e.kind() == ErrorKind::InvalidFormat {
            ApiError::bad_request(e.to_string())
        } else {
            ApiError::from(e)
        }
    })?;

    Ok(Json(UploadResponse { id: id.to_string() }))
}

/// Keep the extractor's own status (413 for an oversized body).
fn multipart_error(e: MultipartError) -> ApiError {
    ApiError::new(e.status(), e.body_text())
}
