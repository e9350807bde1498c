use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;

use crate::database::entities::season_ranges;
use crate::errors::{CmsError, CmsResult};
use crate::server::requests::SeasonRangeRequest;

#[derive(Clone)]
pub struct SeasonService {
    db: DatabaseConnection,
}

impl SeasonService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> CmsResult<Vec<season_ranges::Model>> {
        let seasons = season_ranges::Entity::find()
            .order_by_asc(season_ranges::Column::StartDate)
            .all(&self.db)
            .await?;
        Ok(seasons)
    }

    /// Rejects a range that shares at least one day with another season.
    /// `exclude_id` skips the range being edited.
    async fn ensure_no_overlap(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        exclude_id: Option<i32>,
    ) -> CmsResult<()> {
        let mut query = season_ranges::Entity::find()
            .filter(season_ranges::Column::StartDate.lte(end))
            .filter(season_ranges::Column::EndDate.gte(start));
        if let Some(id) = exclude_id {
            query = query.filter(season_ranges::Column::Id.ne(id));
        }

        if let Some(existing) = query.one(&self.db).await? {
            return Err(CmsError::validation(format!(
                "Date range overlaps existing season: {}",
                existing.label
            )));
        }
        Ok(())
    }

    fn dates(request: &SeasonRangeRequest) -> CmsResult<(NaiveDate, NaiveDate)> {
        request
            .dates()
            .ok_or_else(|| CmsError::validation("Date format: YYYY-MM-DD"))
    }

    pub async fn create(&self, request: SeasonRangeRequest) -> CmsResult<season_ranges::Model> {
        let (start, end) = Self::dates(&request)?;
        self.ensure_no_overlap(start, end, None).await?;

        let now = Utc::now();
        let season = season_ranges::ActiveModel {
            label: Set(request.label),
            start_date: Set(start),
            end_date: Set(end),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!("Created season range {} ({} - {})", season.label, start, end);
        Ok(season)
    }

    pub async fn update(
        &self,
        id: i32,
        request: SeasonRangeRequest,
    ) -> CmsResult<season_ranges::Model> {
        let (start, end) = Self::dates(&request)?;
        let existing = season_ranges::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CmsError::not_found("Season not found"))?;
        self.ensure_no_overlap(start, end, Some(id)).await?;

        let mut active: season_ranges::ActiveModel = existing.into();
        active.label = Set(request.label);
        active.start_date = Set(start);
        active.end_date = Set(end);
        active.updated_at = Set(Utc::now());
        Ok(active.update(&self.db).await?)
    }

    pub async fn delete(&self, id: i32) -> CmsResult<()> {
        let result = season_ranges::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(CmsError::not_found("Season not found"));
        }
        Ok(())
    }
}
