use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{error, info, warn};

use crate::database::entities::{apartments, media, MediaCategory};
use crate::errors::{CmsError, CmsResult};
use crate::server::requests::{MediaUpdateRequest, ReorderItem};
use crate::storage::image::{
    compressed_key, generate_image_key, is_allowed_mime_type, process_image, WEBP_MIME,
};
use crate::storage::{MediaStorage, SIGNED_URL_TTL};

pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Default)]
pub struct MediaFilter {
    pub category: Option<MediaCategory>,
    pub apartment_id: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    pub category: MediaCategory,
    pub apartment_id: Option<i32>,
    pub alt: Option<String>,
}

#[derive(Clone)]
pub struct MediaService {
    db: DatabaseConnection,
    storage: MediaStorage,
}

impl MediaService {
    pub fn new(db: DatabaseConnection, storage: MediaStorage) -> Self {
        Self { db, storage }
    }

    pub async fn list(&self, filter: MediaFilter) -> CmsResult<Vec<media::Model>> {
        let mut query = media::Entity::find();
        if let Some(category) = filter.category {
            query = query.filter(media::Column::Category.eq(category.as_str()));
        }
        if let Some(apartment_id) = filter.apartment_id {
            query = query.filter(media::Column::ApartmentId.eq(apartment_id));
        }
        let items = query
            .order_by_asc(media::Column::Order)
            .order_by_asc(media::Column::Id)
            .all(&self.db)
            .await?;
        Ok(items)
    }

    pub async fn gallery(&self) -> CmsResult<Vec<media::Model>> {
        self.list(MediaFilter {
            category: Some(MediaCategory::Gallery),
            apartment_id: None,
        })
        .await
    }

    async fn ensure_apartment(&self, apartment_id: Option<i32>) -> CmsResult<()> {
        if let Some(id) = apartment_id {
            apartments::Entity::find_by_id(id)
                .one(&self.db)
                .await?
                .ok_or_else(|| CmsError::not_found("Apartment not found"))?;
        }
        Ok(())
    }

    async fn next_order(&self, category: MediaCategory) -> CmsResult<i32> {
        let max: Option<Option<i32>> = media::Entity::find()
            .select_only()
            .column_as(media::Column::Order.max(), "max_order")
            .filter(media::Column::Category.eq(category.as_str()))
            .into_tuple()
            .one(&self.db)
            .await?;
        Ok(max.flatten().unwrap_or(0) + 1)
    }

    /// Stores the original and a WebP rendition, then records both URLs.
    /// Storage and processing failures are logged and reported generically.
    pub async fn upload(&self, upload: MediaUpload) -> CmsResult<media::Model> {
        if upload.bytes.is_empty() {
            return Err(CmsError::validation("No file to upload"));
        }
        if !is_allowed_mime_type(&upload.mime_type) {
            return Err(CmsError::validation(
                "Unsupported file type. Allowed: JPG, PNG, GIF, WebP",
            ));
        }
        if upload.bytes.len() > MAX_UPLOAD_BYTES {
            return Err(CmsError::validation("File too large. Maximum size: 10MB"));
        }
        self.ensure_apartment(upload.apartment_id).await?;

        match self.store_and_record(upload).await {
            Ok(model) => Ok(model),
            Err(e) => {
                error!("Upload error: {:#}", e);
                Err(CmsError::internal("Failed to upload file"))
            }
        }
    }

    async fn store_and_record(&self, upload: MediaUpload) -> anyhow::Result<media::Model> {
        let MediaUpload {
            filename,
            mime_type,
            bytes,
            category,
            apartment_id,
            alt,
        } = upload;

        let processed =
            tokio::task::spawn_blocking(move || process_image(bytes, &mime_type)).await??;

        let original_key = generate_image_key(&filename, Some("original"));
        let webp_key = compressed_key(&original_key);

        let stored = async {
            let (url_original, url_compressed) = tokio::try_join!(
                self.storage.upload(
                    &original_key,
                    processed.original,
                    &processed.original_mime_type
                ),
                self.storage.upload(&webp_key, processed.compressed, WEBP_MIME),
            )?;

            let order = self.next_order(category).await?;
            let now = Utc::now();
            let model = media::ActiveModel {
                url_original: Set(url_original),
                url_compressed: Set(url_compressed),
                alt: Set(alt),
                order: Set(order),
                category: Set(category.as_str().to_string()),
                apartment_id: Set(apartment_id),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&self.db)
            .await?;
            anyhow::Ok(model)
        }
        .await;

        match stored {
            Ok(model) => {
                info!("Uploaded media {} as {}", model.id, original_key);
                Ok(model)
            }
            Err(e) => {
                self.discard_objects(&[original_key.as_str(), webp_key.as_str()]).await;
                Err(e)
            }
        }
    }

    /// Best-effort cleanup of objects that never got a row.
    async fn discard_objects(&self, keys: &[&str]) {
        for key in keys {
            if let Err(e) = self.storage.delete(key).await {
                warn!("Failed to remove orphaned object {}: {}", key, e);
            }
        }
    }

    pub async fn update(&self, id: i32, request: MediaUpdateRequest) -> CmsResult<media::Model> {
        let existing = media::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CmsError::not_found("Media not found"))?;
        if let Some(apartment_id) = request.apartment_id {
            self.ensure_apartment(apartment_id).await?;
        }

        let mut active: media::ActiveModel = existing.into();
        if let Some(alt) = request.alt {
            active.alt = Set(Some(alt));
        }
        if let Some(order) = request.order {
            active.order = Set(order);
        }
        if let Some(category) = request.category {
            active.category = Set(category.as_str().to_string());
        }
        if let Some(apartment_id) = request.apartment_id {
            active.apartment_id = Set(apartment_id);
        }
        active.updated_at = Set(Utc::now());
        Ok(active.update(&self.db).await?)
    }

    /// Removes the row even when the stored objects cannot be deleted.
    pub async fn delete(&self, id: i32) -> CmsResult<()> {
        let existing = media::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CmsError::not_found("Media not found"))?;

        for url in [&existing.url_original, &existing.url_compressed] {
            match self.storage.key_from_url(url) {
                Some(key) => {
                    if let Err(e) = self.storage.delete(&key).await {
                        warn!("R2 delete error for {}: {}", key, e);
                    }
                }
                None => warn!("Media {} URL {} is outside the public bucket", id, url),
            }
        }

        media::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    pub async fn reorder(&self, items: &[ReorderItem]) -> CmsResult<()> {
        let txn = self.db.begin().await?;
        let now = Utc::now();

        for item in items {
            let result = media::Entity::update_many()
                .col_expr(media::Column::Order, Expr::value(item.order))
                .col_expr(media::Column::UpdatedAt, Expr::value(now))
                .filter(media::Column::Id.eq(item.id))
                .exec(&txn)
                .await?;
            if result.rows_affected == 0 {
                txn.rollback().await?;
                return Err(CmsError::not_found(format!("Media {} not found", item.id)));
            }
        }

        txn.commit().await?;
        Ok(())
    }

    pub async fn signed_url(&self, key: &str) -> CmsResult<String> {
        if key.trim().is_empty() {
            return Err(CmsError::validation("Key is required"));
        }
        self.storage
            .signed_url(key, SIGNED_URL_TTL)
            .await
            .map_err(|e| CmsError::internal("Failed to sign URL").with_source(e))
    }
}
