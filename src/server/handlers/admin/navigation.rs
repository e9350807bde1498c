use axum::{extract::State, response::Json};
use serde_json::Value;

use crate::database::entities::navigation_items;
use crate::errors::CmsResult;
use crate::server::app::AppState;
use crate::server::handlers::{success, IdPath};
use crate::server::middleware::ValidatedJson;
use crate::server::requests::{NavigationCreateRequest, NavigationUpdateRequest, ReorderRequest};

pub async fn list_navigation(
    State(state): State<AppState>,
) -> CmsResult<Json<Vec<navigation_items::Model>>> {
    Ok(Json(state.navigation().list().await?))
}

pub async fn create_navigation_item(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<NavigationCreateRequest>,
) -> CmsResult<Json<navigation_items::Model>> {
    Ok(Json(state.navigation().create(request).await?))
}

pub async fn update_navigation_item(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(request): ValidatedJson<NavigationUpdateRequest>,
) -> CmsResult<Json<navigation_items::Model>> {
    Ok(Json(state.navigation().update(id, request).await?))
}

pub async fn delete_navigation_item(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> CmsResult<Json<Value>> {
    state.navigation().delete(id).await?;
    Ok(success())
}

pub async fn reorder_navigation(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ReorderRequest>,
) -> CmsResult<Json<Value>> {
    state.navigation().reorder(&request.items).await?;
    Ok(success())
}
