use axum::{extract::State, response::Json};
use serde_json::Value;

use crate::database::entities::pages;
use crate::errors::CmsResult;
use crate::server::app::AppState;
use crate::server::handlers::{success, IdPath};
use crate::server::middleware::ValidatedJson;
use crate::server::requests::{PageCreateRequest, PageUpdateRequest};

pub async fn list_pages(State(state): State<AppState>) -> CmsResult<Json<Vec<pages::Model>>> {
    Ok(Json(state.pages().list().await?))
}

pub async fn get_page(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> CmsResult<Json<pages::Model>> {
    Ok(Json(state.pages().get(id).await?))
}

pub async fn create_page(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<PageCreateRequest>,
) -> CmsResult<Json<pages::Model>> {
    Ok(Json(state.pages().create(request).await?))
}

pub async fn update_page(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(request): ValidatedJson<PageUpdateRequest>,
) -> CmsResult<Json<pages::Model>> {
    Ok(Json(state.pages().update(id, request).await?))
}

pub async fn delete_page(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> CmsResult<Json<Value>> {
    state.pages().delete(id).await?;
    Ok(success())
}
