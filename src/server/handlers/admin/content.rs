use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::database::entities::page_content;
use crate::errors::CmsResult;
use crate::server::app::AppState;
use crate::server::handlers::{success, IdPath};
use crate::server::middleware::ValidatedJson;
use crate::server::requests::{BulkContentRequest, ContentItemRequest};
use crate::services::content_service::{BulkSaveResult, ContentFilter};

#[derive(Debug, Default, Deserialize)]
pub struct ContentQuery {
    pub page: Option<String>,
    pub section: Option<String>,
}

pub async fn list_content(
    State(state): State<AppState>,
    Query(query): Query<ContentQuery>,
) -> CmsResult<Json<Vec<page_content::Model>>> {
    let filter = ContentFilter {
        page: query.page.filter(|page| !page.is_empty()),
        section: query.section.filter(|section| !section.is_empty()),
    };
    Ok(Json(state.content().list(filter).await?))
}

pub async fn upsert_content(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ContentItemRequest>,
) -> CmsResult<Json<page_content::Model>> {
    Ok(Json(state.content().upsert(request).await?))
}

/// Applies a whole edit session at once; any failure leaves the table untouched.
pub async fn bulk_save_content(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<BulkContentRequest>,
) -> CmsResult<Json<BulkSaveResult>> {
    Ok(Json(state.content().bulk_upsert(request).await?))
}

pub async fn delete_content(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> CmsResult<Json<Value>> {
    state.content().delete(id).await?;
    Ok(success())
}
