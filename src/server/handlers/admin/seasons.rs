use axum::{extract::State, response::Json};
use serde_json::Value;

use crate::database::entities::season_ranges;
use crate::errors::CmsResult;
use crate::server::app::AppState;
use crate::server::handlers::{success, IdPath};
use crate::server::middleware::ValidatedJson;
use crate::server::requests::SeasonRangeRequest;

pub async fn list_seasons(
    State(state): State<AppState>,
) -> CmsResult<Json<Vec<season_ranges::Model>>> {
    Ok(Json(state.seasons().list().await?))
}

pub async fn create_season(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SeasonRangeRequest>,
) -> CmsResult<Json<season_ranges::Model>> {
    Ok(Json(state.seasons().create(request).await?))
}

pub async fn update_season(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(request): ValidatedJson<SeasonRangeRequest>,
) -> CmsResult<Json<season_ranges::Model>> {
    Ok(Json(state.seasons().update(id, request).await?))
}

pub async fn delete_season(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> CmsResult<Json<Value>> {
    state.seasons().delete(id).await?;
    Ok(success())
}
