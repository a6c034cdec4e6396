//! Merge route - concatenate stored documents into a new one.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Deserialize;
use std::sync::Arc;

use super::MergeResponse;
use crate::helpers::{ApiError, ResultExt, RouteResult};
use crate::state::AppState;

/// Request body for a merge.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeRequest {
    /// Identifiers in output order
    pub pdf_id_list: Option<Vec<String>>,
}

pub async fn merge_pdfs(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MergeRequest>, JsonRejection>,
) -> RouteResult<Json<MergeResponse>> {
    let Json(request) = payload.or_bad_request()?;
    let ids = request
        .pdf_id_list
        .ok_or_else(|| ApiError::internal("pdfIdList should be a list of PDF ids"))?;

    let id = state.workshop.merge(&ids).await?;

    Ok(Json(MergeResponse {
        message: format!("PDFs merged successfully, the id of the new pdf is : {id}"),
        id: id.to_string(),
    }))
}
