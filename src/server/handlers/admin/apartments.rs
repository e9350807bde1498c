use axum::{extract::State, response::Json};
use serde_json::Value;

use crate::errors::CmsResult;
use crate::server::app::AppState;
use crate::server::handlers::{success, IdPath};
use crate::server::middleware::ValidatedJson;
use crate::server::requests::ApartmentRequest;
use crate::services::apartment_service::ApartmentDetail;

pub async fn list_apartments(State(state): State<AppState>) -> CmsResult<Json<Vec<ApartmentDetail>>> {
    Ok(Json(state.apartments().list().await?))
}

pub async fn get_apartment(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> CmsResult<Json<ApartmentDetail>> {
    Ok(Json(state.apartments().get(id).await?))
}

pub async fn create_apartment(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ApartmentRequest>,
) -> CmsResult<Json<ApartmentDetail>> {
    Ok(Json(state.apartments().create(request).await?))
}

pub async fn update_apartment(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(request): ValidatedJson<ApartmentRequest>,
) -> CmsResult<Json<ApartmentDetail>> {
    Ok(Json(state.apartments().update(id, request).await?))
}

/// Removes the apartment with its pricing; its media stays in the library.
pub async fn delete_apartment(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> CmsResult<Json<Value>> {
    state.apartments().delete(id).await?;
    Ok(success())
}
