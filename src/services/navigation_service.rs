use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::database::entities::navigation_items;
use crate::errors::{CmsError, CmsResult};
use crate::server::requests::{
    NavigationCreateRequest, NavigationUpdateRequest, ReorderItem,
};

#[derive(Clone)]
pub struct NavigationService {
    db: DatabaseConnection,
}

impl NavigationService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list_active(&self) -> CmsResult<Vec<navigation_items::Model>> {
        let items = navigation_items::Entity::find()
            .filter(navigation_items::Column::IsActive.eq(true))
            .order_by_asc(navigation_items::Column::Order)
            .order_by_asc(navigation_items::Column::Id)
            .all(&self.db)
            .await?;
        Ok(items)
    }

    pub async fn list(&self) -> CmsResult<Vec<navigation_items::Model>> {
        let items = navigation_items::Entity::find()
            .order_by_asc(navigation_items::Column::Order)
            .order_by_asc(navigation_items::Column::Id)
            .all(&self.db)
            .await?;
        Ok(items)
    }

    async fn next_order(&self) -> CmsResult<i32> {
        let max: Option<Option<i32>> = navigation_items::Entity::find()
            .select_only()
            .column_as(navigation_items::Column::Order.max(), "max_order")
            .into_tuple()
            .one(&self.db)
            .await?;
        Ok(max.flatten().map_or(0, |order| order + 1))
    }

    pub async fn create(
        &self,
        request: NavigationCreateRequest,
    ) -> CmsResult<navigation_items::Model> {
        let order = match request.order {
            Some(order) => order,
            None => self.next_order().await?,
        };

        let now = Utc::now();
        let item = navigation_items::ActiveModel {
            label: Set(request.label),
            path: Set(request.path),
            order: Set(order),
            is_active: Set(request.is_active.unwrap_or(true)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        Ok(item)
    }

    pub async fn update(
        &self,
        id: i32,
        request: NavigationUpdateRequest,
    ) -> CmsResult<navigation_items::Model> {
        let existing = navigation_items::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CmsError::not_found("Navigation item not found"))?;

        let mut active: navigation_items::ActiveModel = existing.into();
        if let Some(label) = request.label {
            active.label = Set(label);
        }
        if let Some(path) = request.path {
            active.path = Set(path);
        }
        if let Some(order) = request.order {
            active.order = Set(order);
        }
        if let Some(is_active) = request.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now());
        Ok(active.update(&self.db).await?)
    }

    pub async fn delete(&self, id: i32) -> CmsResult<()> {
        let result = navigation_items::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(CmsError::not_found("Navigation item not found"));
        }
        Ok(())
    }

    /// Applies all positions in one transaction; an unknown id aborts the lot.
    pub async fn reorder(&self, items: &[ReorderItem]) -> CmsResult<()> {
        let txn = self.db.begin().await?;
        let now = Utc::now();

        for item in items {
            let result = navigation_items::Entity::update_many()
                .col_expr(navigation_items::Column::Order, Expr::value(item.order))
                .col_expr(navigation_items::Column::UpdatedAt, Expr::value(now))
                .filter(navigation_items::Column::Id.eq(item.id))
                .exec(&txn)
                .await?;
            if result.rows_affected == 0 {
                txn.rollback().await?;
                return Err(CmsError::not_found(format!(
                    "Navigation item {} not found",
                    item.id
                )));
            }
        }

        txn.commit().await?;
        Ok(())
    }
}
