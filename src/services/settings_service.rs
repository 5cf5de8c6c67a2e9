//! School settings.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::SchoolSettings;
use crate::errors::{AppError, AppResult};
use crate::infra::{SettingsPatch, UnitOfWork};

/// Settings service trait for dependency injection.
#[async_trait]
pub trait SettingsService: Send + Sync {
    async fn get_settings(&self) -> AppResult<SchoolSettings>;

    async fn update_settings(&self, patch: SettingsPatch) -> AppResult<SchoolSettings>;
}

/// Concrete implementation of SettingsService using Unit of Work.
pub struct SettingsManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> SettingsManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> SettingsService for SettingsManager<U> {
    async fn get_settings(&self) -> AppResult<SchoolSettings> {
        self.uow.settings().get().await?.ok_or(AppError::NotFound)
    }

    async fn update_settings(&self, patch: SettingsPatch) -> AppResult<SchoolSettings> {
        if patch.school_name.as_deref().is_some_and(str::is_empty) {
            return Err(AppError::validation("school_name must not be empty"));
        }

        self.uow.settings().upsert(patch).await
    }
}
