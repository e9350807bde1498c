use axum::{
    extract::{multipart::MultipartError, Multipart, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::database::entities::{media, MediaCategory};
use crate::errors::{CmsError, CmsResult};
use crate::server::app::AppState;
use crate::server::handlers::{success, IdPath};
use crate::server::middleware::ValidatedJson;
use crate::server::requests::{MediaUpdateRequest, ReorderRequest};
use crate::services::media_service::{MediaFilter, MediaUpload, MAX_UPLOAD_BYTES};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaQuery {
    pub category: Option<String>,
    pub apartment_id: Option<String>,
}

fn parse_category(raw: &str) -> CmsResult<MediaCategory> {
    raw.trim()
        .parse::<MediaCategory>()
        .map_err(|_| CmsError::validation(format!("Unknown media category: {}", raw)))
}

fn parse_apartment_id(raw: &str) -> CmsResult<Option<i32>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<i32>()
        .map(Some)
        .map_err(|_| CmsError::validation(format!("Invalid apartmentId: {}", raw)))
}

pub async fn list_media(
    State(state): State<AppState>,
    Query(query): Query<MediaQuery>,
) -> CmsResult<Json<Vec<media::Model>>> {
    let category = match query.category.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(parse_category(raw)?),
    };
    let apartment_id = match query.apartment_id.as_deref() {
        Some(raw) => parse_apartment_id(raw)?,
        None => None,
    };

    let filter = MediaFilter {
        category,
        apartment_id,
    };
    Ok(Json(state.media().list(filter).await?))
}

fn multipart_error(err: MultipartError) -> CmsError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        CmsError::validation(format!(
            "File too large. Maximum size: {}MB",
            MAX_UPLOAD_BYTES / (1024 * 1024)
        ))
    } else {
        CmsError::validation(err.body_text())
    }
}

/// Multipart fields: `file` (required), `category`, `apartmentId`, `alt`.
pub async fn upload_media(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> CmsResult<Json<media::Model>> {
    let mut file: Option<(String, String, Vec<u8>)> = None;
    let mut category = MediaCategory::default();
    let mut apartment_id = None;
    let mut alt = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let mime_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                file = Some((filename, mime_type, bytes.to_vec()));
            }
            "category" => {
                let raw = field.text().await.map_err(multipart_error)?;
                if !raw.trim().is_empty() {
                    category = parse_category(&raw)?;
                }
            }
            "apartmentId" => {
                let raw = field.text().await.map_err(multipart_error)?;
                apartment_id = parse_apartment_id(&raw)?;
            }
            "alt" => {
                let raw = field.text().await.map_err(multipart_error)?;
                alt = Some(raw).filter(|alt| !alt.trim().is_empty());
            }
            other => debug!("Ignoring multipart field {}", other),
        }
    }

    let (filename, mime_type, bytes) =
        file.ok_or_else(|| CmsError::validation("No file to upload"))?;

    let upload = MediaUpload {
        filename,
        mime_type,
        bytes,
        category,
        apartment_id,
        alt,
    };
    Ok(Json(state.media().upload(upload).await?))
}

pub async fn update_media(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(request): ValidatedJson<MediaUpdateRequest>,
) -> CmsResult<Json<media::Model>> {
    Ok(Json(state.media().update(id, request).await?))
}

pub async fn delete_media(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> CmsResult<Json<Value>> {
    state.media().delete(id).await?;
    Ok(success())
}

pub async fn reorder_media(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ReorderRequest>,
) -> CmsResult<Json<Value>> {
    request.ensure_non_negative()?;
    state.media().reorder(&request.items).await?;
    Ok(success())
}

#[derive(Debug, Default, Deserialize)]
pub struct SignedUrlQuery {
    pub key: Option<String>,
}

/// Short-lived download link for an object in the private bucket.
pub async fn signed_url(
    State(state): State<AppState>,
    Query(query): Query<SignedUrlQuery>,
) -> CmsResult<Json<Value>> {
    let key = query.key.unwrap_or_default();
    let url = state.media().signed_url(&key).await?;
    Ok(Json(json!({ "url": url })))
}
