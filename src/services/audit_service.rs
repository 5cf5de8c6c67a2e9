//! Audit trail.
//!
//! Recording is best-effort: a failed audit write is logged and
//! swallowed so it never fails the mutation it describes.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::AUDIT_LIST_LIMIT;
use crate::domain::AuditLog;
use crate::errors::AppResult;
use crate::infra::UnitOfWork;

/// Audit service trait for dependency injection.
#[async_trait]
pub trait AuditService: Send + Sync {
    /// Record an action; failures are logged, never propagated
    async fn record(
        &self,
        user_id: Uuid,
        action: &str,
        entity: &str,
        entity_id: Option<Uuid>,
        detail: Option<String>,
    );

    async fn list_recent(&self) -> AppResult<Vec<AuditLog>>;
}

/// Concrete implementation of AuditService using Unit of Work.
pub struct AuditRecorder<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> AuditRecorder<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuditService for AuditRecorder<U> {
    async fn record(
        &self,
        user_id: Uuid,
        action: &str,
        entity: &str,
        entity_id: Option<Uuid>,
        detail: Option<String>,
    ) {
        if let Err(e) = self
            .uow
            .audit()
            .insert(
                user_id,
                action.to_string(),
                entity.to_string(),
                entity_id,
                detail,
            )
            .await
        {
            tracing::warn!(action, entity, "audit write failed: {}", e);
        }
    }

    async fn list_recent(&self) -> AppResult<Vec<AuditLog>> {
        self.uow.audit().list_recent(AUDIT_LIST_LIMIT).await
    }
}
