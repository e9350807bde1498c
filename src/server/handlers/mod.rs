pub mod admin;
pub mod auth;
pub mod health;
pub mod public;

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::{request::Parts, Uri},
    Json,
};
use serde_json::{json, Value};

use crate::errors::CmsError;

/// Numeric `:id` path segment. Anything that is not an `i32` is a 400 with
/// the usual JSON error body instead of axum's plain-text rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdPath(pub i32);

#[async_trait]
impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = CmsError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| CmsError::validation(rejection.body_text()))?;

        raw.trim()
            .parse::<i32>()
            .map(IdPath)
            .map_err(|_| CmsError::validation(format!("Invalid ID: {}", raw)))
    }
}

pub fn success() -> Json<Value> {
    Json(json!({ "success": true }))
}

pub async fn not_found(uri: Uri) -> CmsError {
    CmsError::not_found(format!("Route not found: {}", uri.path()))
}
