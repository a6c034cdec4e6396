//! Page editing routes - move and remove.
//!
//! Indices come in the query string and are parsed here; range checks happen
//! against the stored document's current page count.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use pdf_workshop_core::PageIndex;
use serde::Deserialize;
use std::sync::Arc;

use super::MessageResponse;
use crate::helpers::RouteResult;
use crate::state::AppState;

/// Query params for moving a page.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MovePageQuery {
    #[serde(default)]
    pub source_index: Option<String>,
    #[serde(default)]
    pub target_index: Option<String>,
}

/// Query params for removing a page.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RemovePageQuery {
    #[serde(default)]
    pub page_index: Option<String>,
}

pub async fn move_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<MovePageQuery>,
) -> RouteResult<Json<MessageResponse>> {
    let source = PageIndex::parse(query.source_index.as_deref().unwrap_or(""), "sourceIndex")?;
    let target = PageIndex::parse(query.target_index.as_deref().unwrap_or(""), "targetIndex")?;

    state.workshop.move_page(&id, source, target).await?;

    Ok(Json(MessageResponse::new(format!(
        "Page {source} moved to {target} successfully"
    ))))
}

pub async fn remove_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<RemovePageQuery>,
) -> RouteResult<Json<MessageResponse>> {
    let index = PageIndex::parse(query.page_index.as_deref().unwrap_or(""), "pageIndex")?;

    state.workshop.remove_page(&id, index).await?;

    Ok(Json(MessageResponse::new(format!(
        "The page {index} was removed successfully"
    ))))
}
