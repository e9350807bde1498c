use std::collections::BTreeMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::database::entities::{page_content, ContentType};
use crate::errors::{CmsError, CmsResult};
use crate::server::requests::{BulkContentRequest, ContentItemRequest};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentEntry {
    pub value: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    #[serde(default)]
    pub metadata: Option<Value>,
}

/// `{ section: { key: entry } }` for one page.
pub type PageContentMap = BTreeMap<String, BTreeMap<String, ContentEntry>>;

#[derive(Debug, Clone, Default)]
pub struct ContentFilter {
    pub page: Option<String>,
    pub section: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkSaveResult {
    pub success: bool,
    pub count: usize,
    pub items: Vec<page_content::Model>,
}

pub fn nest_content(rows: impl IntoIterator<Item = page_content::Model>) -> PageContentMap {
    let mut content = PageContentMap::new();
    for row in rows {
        let content_type = row.content_type.parse().unwrap_or_default();
        content.entry(row.section).or_default().insert(
            row.key,
            ContentEntry {
                value: row.value,
                content_type,
                metadata: row.metadata,
            },
        );
    }
    content
}

async fn upsert_item<C: ConnectionTrait>(
    conn: &C,
    item: ContentItemRequest,
) -> CmsResult<page_content::Model> {
    let now = Utc::now();
    let existing = page_content::Entity::find()
        .filter(page_content::Column::Page.eq(item.page.as_str()))
        .filter(page_content::Column::Section.eq(item.section.as_str()))
        .filter(page_content::Column::Key.eq(item.key.as_str()))
        .one(conn)
        .await?;

    let model = match existing {
        Some(existing) => {
            let mut active: page_content::ActiveModel = existing.into();
            active.value = Set(item.value);
            active.content_type = Set(item.content_type.as_str().to_string());
            if let Some(metadata) = item.metadata {
                active.metadata = Set(Some(metadata));
            }
            active.updated_at = Set(now);
            active.update(conn).await?
        }
        None => {
            page_content::ActiveModel {
                page: Set(item.page),
                section: Set(item.section),
                key: Set(item.key),
                value: Set(item.value),
                content_type: Set(item.content_type.as_str().to_string()),
                metadata: Set(item.metadata),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(conn)
            .await?
        }
    };
    Ok(model)
}

#[derive(Clone)]
pub struct ContentService {
    db: DatabaseConnection,
}

impl ContentService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn page(&self, page: &str) -> CmsResult<PageContentMap> {
        let rows = page_content::Entity::find()
            .filter(page_content::Column::Page.eq(page))
            .order_by_asc(page_content::Column::Section)
            .order_by_asc(page_content::Column::Key)
            .all(&self.db)
            .await?;
        Ok(nest_content(rows))
    }

    pub async fn list(&self, filter: ContentFilter) -> CmsResult<Vec<page_content::Model>> {
        let mut query = page_content::Entity::find();
        if let Some(page) = filter.page.filter(|p| !p.is_empty()) {
            query = query.filter(page_content::Column::Page.eq(page));
        }
        if let Some(section) = filter.section.filter(|s| !s.is_empty()) {
            query = query.filter(page_content::Column::Section.eq(section));
        }

        let rows = query
            .order_by_asc(page_content::Column::Page)
            .order_by_asc(page_content::Column::Section)
            .order_by_asc(page_content::Column::Key)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    pub async fn upsert(&self, item: ContentItemRequest) -> CmsResult<page_content::Model> {
        upsert_item(&self.db, item).await
    }

    /// Applies every item or none of them.
    pub async fn bulk_upsert(&self, request: BulkContentRequest) -> CmsResult<BulkSaveResult> {
        let txn = self.db.begin().await?;
        let mut items = Vec::with_capacity(request.items.len());

        for item in request.items {
            match upsert_item(&txn, item).await {
                Ok(model) => items.push(model),
                Err(e) => {
                    txn.rollback().await?;
                    return Err(e);
                }
            }
        }
        txn.commit().await?;

        info!("Saved {} content items", items.len());
        Ok(BulkSaveResult {
            success: true,
            count: items.len(),
            items,
        })
    }

    pub async fn delete(&self, id: i32) -> CmsResult<()> {
        let result = page_content::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(CmsError::not_found("Content not found"));
        }
        Ok(())
    }
}
