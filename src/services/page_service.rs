use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::database::entities::{pages, PublishStatus};
use crate::errors::{CmsError, CmsResult};
use crate::server::requests::{PageCreateRequest, PageUpdateRequest};

#[derive(Clone)]
pub struct PageService {
    db: DatabaseConnection,
}

impl PageService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> CmsResult<Vec<pages::Model>> {
        let rows = pages::Entity::find()
            .order_by_asc(pages::Column::Title)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    pub async fn get(&self, id: i32) -> CmsResult<pages::Model> {
        pages::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CmsError::not_found("Page not found"))
    }

    pub async fn get_published(&self, slug: &str) -> CmsResult<pages::Model> {
        pages::Entity::find()
            .filter(pages::Column::Slug.eq(slug))
            .filter(pages::Column::Status.eq(PublishStatus::Published.as_str()))
            .one(&self.db)
            .await?
            .ok_or_else(|| CmsError::not_found("Page not found"))
    }

    async fn ensure_slug_free(&self, slug: &str, exclude_id: Option<i32>) -> CmsResult<()> {
        let mut query = pages::Entity::find().filter(pages::Column::Slug.eq(slug));
        if let Some(id) = exclude_id {
            query = query.filter(pages::Column::Id.ne(id));
        }
        if query.count(&self.db).await? > 0 {
            let mut errors = crate::errors::ValidationErrors::new();
            errors.add("slug", "Slug is already in use");
            return Err(errors.into());
        }
        Ok(())
    }

    pub async fn create(&self, request: PageCreateRequest) -> CmsResult<pages::Model> {
        self.ensure_slug_free(&request.slug, None).await?;

        let now = Utc::now();
        let page = pages::ActiveModel {
            title: Set(request.title),
            slug: Set(request.slug),
            content: Set(request.content),
            status: Set(request.status.as_str().to_string()),
            show_in_footer: Set(request.show_in_footer),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        Ok(page)
    }

    pub async fn update(&self, id: i32, request: PageUpdateRequest) -> CmsResult<pages::Model> {
        let existing = self.get(id).await?;
        if let Some(slug) = &request.slug {
            self.ensure_slug_free(slug, Some(id)).await?;
        }

        let mut active: pages::ActiveModel = existing.into();
        if let Some(title) = request.title {
            active.title = Set(title);
        }
        if let Some(slug) = request.slug {
            active.slug = Set(slug);
        }
        if let Some(content) = request.content {
            active.content = Set(content);
        }
        if let Some(status) = request.status {
            active.status = Set(status.as_str().to_string());
        }
        if let Some(show_in_footer) = request.show_in_footer {
            active.show_in_footer = Set(show_in_footer);
        }
        active.updated_at = Set(Utc::now());
        Ok(active.update(&self.db).await?)
    }

    pub async fn delete(&self, id: i32) -> CmsResult<()> {
        let result = pages::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(CmsError::not_found("Page not found"));
        }
        Ok(())
    }
}
