use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An inclusive date interval classified as high season.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "season_ranges")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub label: String,
    pub start_date: Date,
    pub end_date: Date,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn contains(&self, date: Date) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    pub fn overlaps(&self, start: Date, end: Date) -> bool {
        self.start_date <= end && self.end_date >= start
    }
}
