//! Compress route - shrink a stored document in place.

use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::MessageResponse;
use crate::helpers::RouteResult;
use crate::state::AppState;

pub async fn compress_pdf(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> RouteResult<Json<MessageResponse>> {
    state.workshop.compress(&id).await?;
    Ok(Json(MessageResponse::new("PDF compressed successfully")))
}
