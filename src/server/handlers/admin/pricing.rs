use axum::{extract::State, response::Json};
use serde_json::Value;

use crate::errors::CmsResult;
use crate::server::app::AppState;
use crate::server::handlers::{success, IdPath};
use crate::server::middleware::ValidatedJson;
use crate::server::requests::{PricingCreateRequest, PricingUpdateRequest};
use crate::services::pricing_service::PricingWithApartment;

pub async fn list_pricing(
    State(state): State<AppState>,
) -> CmsResult<Json<Vec<PricingWithApartment>>> {
    Ok(Json(state.pricing().list_with_apartment().await?))
}

pub async fn create_pricing(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<PricingCreateRequest>,
) -> CmsResult<Json<PricingWithApartment>> {
    Ok(Json(state.pricing().create(request).await?))
}

pub async fn update_pricing(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(request): ValidatedJson<PricingUpdateRequest>,
) -> CmsResult<Json<PricingWithApartment>> {
    Ok(Json(state.pricing().update(id, request).await?))
}

pub async fn delete_pricing(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> CmsResult<Json<Value>> {
    state.pricing().delete(id).await?;
    Ok(success())
}
