use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::database::entities::{news, PublishStatus};
use crate::errors::{CmsError, CmsResult};
use crate::server::app::AppState;
use crate::server::handlers::{success, IdPath};
use crate::server::middleware::ValidatedJson;
use crate::server::requests::{NewsCreateRequest, NewsUpdateRequest};

#[derive(Debug, Default, Deserialize)]
pub struct NewsQuery {
    pub status: Option<String>,
}

pub async fn list_news(
    State(state): State<AppState>,
    Query(query): Query<NewsQuery>,
) -> CmsResult<Json<Vec<news::Model>>> {
    let status = match query.status.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(
            raw.parse::<PublishStatus>()
                .map_err(|_| CmsError::validation(format!("Unknown status: {}", raw)))?,
        ),
    };
    Ok(Json(state.news().list(status).await?))
}

pub async fn get_news(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> CmsResult<Json<news::Model>> {
    Ok(Json(state.news().get(id).await?))
}

pub async fn create_news(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<NewsCreateRequest>,
) -> CmsResult<Json<news::Model>> {
    Ok(Json(state.news().create(request).await?))
}

pub async fn update_news(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(request): ValidatedJson<NewsUpdateRequest>,
) -> CmsResult<Json<news::Model>> {
    Ok(Json(state.news().update(id, request).await?))
}

pub async fn delete_news(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> CmsResult<Json<Value>> {
    state.news().delete(id).await?;
    Ok(success())
}
