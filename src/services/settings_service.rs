use std::collections::BTreeMap;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use crate::database::entities::global_settings;
use crate::errors::{CmsError, CmsResult};
use crate::server::requests::SettingRequest;

#[derive(Clone)]
pub struct SettingsService {
    db: DatabaseConnection,
}

impl SettingsService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> CmsResult<Vec<global_settings::Model>> {
        let settings = global_settings::Entity::find()
            .order_by_asc(global_settings::Column::Key)
            .all(&self.db)
            .await?;
        Ok(settings)
    }

    pub async fn as_map(&self) -> CmsResult<BTreeMap<String, String>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .map(|setting| (setting.key, setting.value))
            .collect())
    }

    pub async fn upsert(&self, request: SettingRequest) -> CmsResult<global_settings::Model> {
        let now = Utc::now();
        let existing = global_settings::Entity::find_by_id(request.key.clone())
            .one(&self.db)
            .await?;

        let model = match existing {
            Some(existing) => {
                let mut active: global_settings::ActiveModel = existing.into();
                active.value = Set(request.value);
                active.updated_at = Set(now);
                active.update(&self.db).await?
            }
            None => {
                global_settings::ActiveModel {
                    key: Set(request.key),
                    value: Set(request.value),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(&self.db)
                .await?
            }
        };
        Ok(model)
    }

    pub async fn delete(&self, key: &str) -> CmsResult<()> {
        let result = global_settings::Entity::delete_by_id(key.to_string())
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(CmsError::not_found("Setting not found"));
        }
        Ok(())
    }
}
