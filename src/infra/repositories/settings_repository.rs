//! School settings repository. The table holds a single row which is
//! created on first write.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use super::entities::school_settings::{ActiveModel, Entity as SettingsEntity};
use crate::domain::SchoolSettings;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Partial update; None leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsPatch {
    pub school_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub academic_year: Option<String>,
    pub currency: Option<String>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// The settings row, if it has ever been written
    async fn get(&self) -> AppResult<Option<SchoolSettings>>;

    /// Apply a patch, creating the row with defaults if absent
    async fn upsert(&self, patch: SettingsPatch) -> AppResult<SchoolSettings>;
}

/// Concrete implementation of SettingsRepository
pub struct SettingsStore {
    db: DatabaseConnection,
}

impl SettingsStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SettingsRepository for SettingsStore {
    async fn get(&self) -> AppResult<Option<SchoolSettings>> {
        let result = SettingsEntity::find()
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(SchoolSettings::from))
    }

    async fn upsert(&self, patch: SettingsPatch) -> AppResult<SchoolSettings> {
        let existing = SettingsEntity::find()
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        let model = match existing {
            Some(model) => {
                let mut active: ActiveModel = model.into();
                if let Some(school_name) = patch.school_name {
                    active.school_name = Set(school_name);
                }
                if let Some(address) = patch.address {
                    active.address = Set(Some(address));
                }
                if let Some(phone) = patch.phone {
                    active.phone = Set(Some(phone));
                }
                if let Some(email) = patch.email {
                    active.email = Set(Some(email));
                }
                if let Some(academic_year) = patch.academic_year {
                    active.academic_year = Set(academic_year);
                }
                if let Some(currency) = patch.currency {
                    active.currency = Set(currency);
                }
                active.updated_at = Set(chrono::Utc::now());
                active.update(&self.db).await.map_err(AppError::from)?
            }
            None => {
                let active = ActiveModel {
                    id: Set(Uuid::new_v4()),
                    school_name: Set(patch.school_name.unwrap_or_default()),
                    address: Set(patch.address),
                    phone: Set(patch.phone),
                    email: Set(patch.email),
                    academic_year: Set(patch.academic_year.unwrap_or_default()),
                    currency: Set(patch.currency.unwrap_or_else(|| "USD".to_string())),
                    updated_at: Set(chrono::Utc::now()),
                };
                active.insert(&self.db).await.map_err(AppError::from)?
            }
        };

        Ok(SchoolSettings::from(model))
    }
}
