//! Audit log repository. Writes are best-effort at the service layer;
//! the repository itself reports failures normally.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::audit_log::{self, ActiveModel, Entity as AuditEntity};
use crate::domain::AuditLog;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AuditRepository: Send + Sync {
    async fn insert(
        &self,
        user_id: Uuid,
        action: String,
        entity: String,
        entity_id: Option<Uuid>,
        detail: Option<String>,
    ) -> AppResult<AuditLog>;

    /// Most recent entries, newest first
    async fn list_recent(&self, limit: u64) -> AppResult<Vec<AuditLog>>;
}

/// Concrete implementation of AuditRepository
pub struct AuditStore {
    db: DatabaseConnection,
}

impl AuditStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AuditRepository for AuditStore {
    async fn insert(
        &self,
        user_id: Uuid,
        action: String,
        entity: String,
        entity_id: Option<Uuid>,
        detail: Option<String>,
    ) -> AppResult<AuditLog> {
        let active = ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            action: Set(action),
            entity: Set(entity),
            entity_id: Set(entity_id),
            detail: Set(detail),
            created_at: Set(chrono::Utc::now()),
        };

        let model = active.insert(&self.db).await.map_err(AppError::from)?;
        Ok(AuditLog::from(model))
    }

    async fn list_recent(&self, limit: u64) -> AppResult<Vec<AuditLog>> {
        let models = AuditEntity::find()
            .order_by_desc(audit_log::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(AuditLog::from).collect())
    }
}
