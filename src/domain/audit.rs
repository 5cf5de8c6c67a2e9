//! Audit log domain entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A best-effort record of who changed what. Writes never fail a request;
/// a failed insert is logged and dropped.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuditLog {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Verb, e.g. "create", "update", "publish"
    #[schema(example = "create")]
    pub action: String,
    /// Entity type, e.g. "student"
    #[schema(example = "student")]
    pub entity: String,
    pub entity_id: Option<Uuid>,
    pub detail: Option<String>,
    pub created_at: DateTime<Utc>,
}
