use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::Value;

use crate::database::entities::global_settings;
use crate::errors::CmsResult;
use crate::server::app::AppState;
use crate::server::handlers::success;
use crate::server::middleware::ValidatedJson;
use crate::server::requests::SettingRequest;

pub async fn list_settings(
    State(state): State<AppState>,
) -> CmsResult<Json<Vec<global_settings::Model>>> {
    Ok(Json(state.settings().list().await?))
}

pub async fn upsert_setting(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SettingRequest>,
) -> CmsResult<Json<global_settings::Model>> {
    Ok(Json(state.settings().upsert(request).await?))
}

pub async fn delete_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> CmsResult<Json<Value>> {
    state.settings().delete(&key).await?;
    Ok(success())
}
