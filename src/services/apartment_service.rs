use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::database::entities::{apartments, media, pricing};
use crate::errors::{CmsError, CmsResult};
use crate::server::requests::ApartmentRequest;
use crate::services::slug::unique_slug;

/// Media shown per apartment on the listing page.
pub const LIST_MEDIA_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApartmentWithMedia {
    #[serde(flatten)]
    pub apartment: apartments::Model,
    pub media: Vec<media::Model>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApartmentDetail {
    #[serde(flatten)]
    pub apartment: apartments::Model,
    pub pricing: Vec<pricing::Model>,
    pub media: Vec<media::Model>,
}

#[derive(Clone)]
pub struct ApartmentService {
    db: DatabaseConnection,
}

impl ApartmentService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn media_by_apartment(&self, ids: &[i32]) -> CmsResult<HashMap<i32, Vec<media::Model>>> {
        let rows = media::Entity::find()
            .filter(media::Column::ApartmentId.is_in(ids.to_vec()))
            .order_by_asc(media::Column::Order)
            .order_by_asc(media::Column::Id)
            .all(&self.db)
            .await?;

        let mut grouped: HashMap<i32, Vec<media::Model>> = HashMap::new();
        for item in rows {
            if let Some(apartment_id) = item.apartment_id {
                grouped.entry(apartment_id).or_default().push(item);
            }
        }
        Ok(grouped)
    }

    async fn pricing_by_apartment(
        &self,
        ids: &[i32],
    ) -> CmsResult<HashMap<i32, Vec<pricing::Model>>> {
        let rows = pricing::Entity::find()
            .filter(pricing::Column::ApartmentId.is_in(ids.to_vec()))
            .order_by_asc(pricing::Column::SeasonType)
            .all(&self.db)
            .await?;

        let mut grouped: HashMap<i32, Vec<pricing::Model>> = HashMap::new();
        for row in rows {
            grouped.entry(row.apartment_id).or_default().push(row);
        }
        Ok(grouped)
    }

    async fn details(&self, list: Vec<apartments::Model>) -> CmsResult<Vec<ApartmentDetail>> {
        let ids: Vec<i32> = list.iter().map(|a| a.id).collect();
        let mut media = self.media_by_apartment(&ids).await?;
        let mut pricing = self.pricing_by_apartment(&ids).await?;

        Ok(list
            .into_iter()
            .map(|apartment| ApartmentDetail {
                pricing: pricing.remove(&apartment.id).unwrap_or_default(),
                media: media.remove(&apartment.id).unwrap_or_default(),
                apartment,
            })
            .collect())
    }

    async fn detail(&self, apartment: apartments::Model) -> CmsResult<ApartmentDetail> {
        let mut details = self.details(vec![apartment]).await?;
        details
            .pop()
            .ok_or_else(|| CmsError::internal("Apartment lookup returned no rows"))
    }

    /// Apartments by name, each with its first few media.
    pub async fn list_public(&self) -> CmsResult<Vec<ApartmentWithMedia>> {
        let list = apartments::Entity::find()
            .order_by_asc(apartments::Column::Name)
            .all(&self.db)
            .await?;
        let ids: Vec<i32> = list.iter().map(|a| a.id).collect();
        let mut media = self.media_by_apartment(&ids).await?;

        Ok(list
            .into_iter()
            .map(|apartment| {
                let mut items = media.remove(&apartment.id).unwrap_or_default();
                items.truncate(LIST_MEDIA_LIMIT);
                ApartmentWithMedia {
                    apartment,
                    media: items,
                }
            })
            .collect())
    }

    pub async fn get_by_slug(&self, slug: &str) -> CmsResult<ApartmentDetail> {
        let apartment = apartments::Entity::find()
            .filter(apartments::Column::Slug.eq(slug))
            .one(&self.db)
            .await?
            .ok_or_else(|| CmsError::not_found("Apartment not found"))?;
        self.detail(apartment).await
    }

    pub async fn list(&self) -> CmsResult<Vec<ApartmentDetail>> {
        let list = apartments::Entity::find()
            .order_by_asc(apartments::Column::Name)
            .all(&self.db)
            .await?;
        self.details(list).await
    }

    pub async fn get(&self, id: i32) -> CmsResult<ApartmentDetail> {
        let apartment = self.find(id).await?;
        self.detail(apartment).await
    }

    async fn find(&self, id: i32) -> CmsResult<apartments::Model> {
        apartments::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CmsError::not_found("Apartment not found"))
    }

    pub async fn create(&self, request: ApartmentRequest) -> CmsResult<ApartmentDetail> {
        let slug = unique_slug(&request.name, "apartment", |candidate| async move {
            let taken = apartments::Entity::find()
                .filter(apartments::Column::Slug.eq(candidate))
                .count(&self.db)
                .await?;
            Ok::<bool, CmsError>(taken > 0)
        })
        .await?;

        let now = Utc::now();
        let apartment = apartments::ActiveModel {
            name: Set(request.name.trim().to_string()),
            slug: Set(slug),
            description: Set(request.description),
            amenities: Set(json!(request.amenities)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!("Created apartment {} ({})", apartment.name, apartment.slug);
        self.detail(apartment).await
    }

    /// Replaces name, description and amenities. The slug stays stable so
    /// published links keep working.
    pub async fn update(&self, id: i32, request: ApartmentRequest) -> CmsResult<ApartmentDetail> {
        let existing = self.find(id).await?;

        let mut active: apartments::ActiveModel = existing.into();
        active.name = Set(request.name.trim().to_string());
        active.description = Set(request.description);
        active.amenities = Set(json!(request.amenities));
        active.updated_at = Set(Utc::now());
        let apartment = active.update(&self.db).await?;

        self.detail(apartment).await
    }

    /// Removes the apartment and its pricing; attached media are kept but
    /// detached.
    pub async fn delete(&self, id: i32) -> CmsResult<()> {
        let txn = self.db.begin().await?;

        pricing::Entity::delete_many()
            .filter(pricing::Column::ApartmentId.eq(id))
            .exec(&txn)
            .await?;
        media::Entity::update_many()
            .col_expr(media::Column::ApartmentId, Expr::value(Option::<i32>::None))
            .filter(media::Column::ApartmentId.eq(id))
            .exec(&txn)
            .await?;
        let result = apartments::Entity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Err(CmsError::not_found("Apartment not found"));
        }

        txn.commit().await?;
        info!("Deleted apartment {}", id);
        Ok(())
    }
}
