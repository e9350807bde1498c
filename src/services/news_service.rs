use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::database::entities::{news, PublishStatus};
use crate::errors::{CmsError, CmsResult};
use crate::server::requests::{NewsCreateRequest, NewsUpdateRequest};
use crate::services::slug::unique_slug;

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 50;
pub const MAX_PAGE: u64 = 1_000_000;

/// Page and size for the public listing. Missing, zero, negative or
/// non-numeric input falls back to page 1 of 10; size is capped at 50 and
/// the page number at [`MAX_PAGE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Self {
        let positive = |raw: Option<&str>| {
            raw.and_then(|value| value.trim().parse::<f64>().ok())
                .filter(|value| value.is_finite() && *value >= 1.0)
                .map(|value| value.floor() as u64)
        };
        Self {
            page: positive(page).unwrap_or(1).min(MAX_PAGE),
            limit: positive(limit).unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.limit)
            .min(i64::MAX as u64)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsSummary {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub feature_image: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

impl From<news::Model> for NewsSummary {
    fn from(model: news::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            slug: model.slug,
            excerpt: model.excerpt,
            feature_image: model.feature_image,
            published_at: model.published_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsPage {
    pub data: Vec<NewsSummary>,
    pub pagination: Pagination,
}

impl NewsPage {
    pub fn empty(request: PageRequest) -> Self {
        Self {
            data: Vec::new(),
            pagination: Pagination {
                page: request.page,
                limit: request.limit,
                total: 0,
                total_pages: 0,
            },
        }
    }
}

/// `published_at` after a status change: set on the transition into
/// `published`, kept while it stays published, cleared on `draft`.
fn published_at_for(
    previous: Option<&news::Model>,
    status: PublishStatus,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match status {
        PublishStatus::Draft => None,
        PublishStatus::Published => match previous {
            Some(existing) if existing.status == PublishStatus::Published.as_str() => {
                existing.published_at.or(Some(now))
            }
            _ => Some(now),
        },
    }
}

#[derive(Clone)]
pub struct NewsService {
    db: DatabaseConnection,
}

impl NewsService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list_published(&self, request: PageRequest) -> CmsResult<NewsPage> {
        let published = news::Entity::find()
            .filter(news::Column::Status.eq(PublishStatus::Published.as_str()));

        let total = published.clone().count(&self.db).await?;
        let rows = published
            .order_by_desc(news::Column::PublishedAt)
            .order_by_desc(news::Column::Id)
            .offset(request.offset())
            .limit(request.limit)
            .all(&self.db)
            .await?;

        Ok(NewsPage {
            data: rows.into_iter().map(NewsSummary::from).collect(),
            pagination: Pagination {
                page: request.page,
                limit: request.limit,
                total,
                total_pages: total.div_ceil(request.limit),
            },
        })
    }

    pub async fn get_published(&self, slug: &str) -> CmsResult<news::Model> {
        news::Entity::find()
            .filter(news::Column::Slug.eq(slug))
            .filter(news::Column::Status.eq(PublishStatus::Published.as_str()))
            .one(&self.db)
            .await?
            .ok_or_else(|| CmsError::not_found("News not found"))
    }

    pub async fn list(&self, status: Option<PublishStatus>) -> CmsResult<Vec<news::Model>> {
        let mut query = news::Entity::find();
        if let Some(status) = status {
            query = query.filter(news::Column::Status.eq(status.as_str()));
        }
        let rows = query
            .order_by_desc(news::Column::CreatedAt)
            .order_by_desc(news::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    pub async fn get(&self, id: i32) -> CmsResult<news::Model> {
        news::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CmsError::not_found("News not found"))
    }

    async fn slug_for(&self, title: &str) -> CmsResult<String> {
        unique_slug(title, "news", |candidate| async move {
            let taken = news::Entity::find()
                .filter(news::Column::Slug.eq(candidate))
                .count(&self.db)
                .await?;
            Ok::<bool, CmsError>(taken > 0)
        })
        .await
    }

    pub async fn create(&self, request: NewsCreateRequest) -> CmsResult<news::Model> {
        let slug = self.slug_for(&request.title).await?;
        let now = Utc::now();

        let model = news::ActiveModel {
            title: Set(request.title),
            slug: Set(slug),
            content: Set(request.content),
            excerpt: Set(request.excerpt),
            feature_image: Set(request.feature_image),
            status: Set(request.status.as_str().to_string()),
            published_at: Set(published_at_for(None, request.status, now)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!("Created news {} ({})", model.id, model.slug);
        Ok(model)
    }

    pub async fn update(&self, id: i32, request: NewsUpdateRequest) -> CmsResult<news::Model> {
        let existing = self.get(id).await?;
        let now = Utc::now();
        let published_at = request
            .status
            .map(|status| published_at_for(Some(&existing), status, now));

        let mut active: news::ActiveModel = existing.into();
        if let Some(title) = request.title {
            active.title = Set(title);
        }
        if let Some(content) = request.content {
            active.content = Set(content);
        }
        if let Some(excerpt) = request.excerpt {
            active.excerpt = Set(Some(excerpt));
        }
        if let Some(feature_image) = request.feature_image {
            active.feature_image = Set(feature_image);
        }
        if let Some(status) = request.status {
            active.status = Set(status.as_str().to_string());
        }
        if let Some(published_at) = published_at {
            active.published_at = Set(published_at);
        }
        active.updated_at = Set(now);

        Ok(active.update(&self.db).await?)
    }

    pub async fn delete(&self, id: i32) -> CmsResult<()> {
        let result = news::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(CmsError::not_found("News not found"));
        }
        Ok(())
    }
}
