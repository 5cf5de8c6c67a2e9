//! School settings singleton.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// School-wide settings. Exactly one row; `GET` creates defaults on first read.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SchoolSettings {
    pub id: Uuid,
    #[schema(example = "Hillcrest Secondary School")]
    pub school_name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    #[schema(example = "2026-2027")]
    pub academic_year: String,
    /// ISO 4217 code used on receipts
    #[schema(example = "USD")]
    pub currency: String,
    pub updated_at: DateTime<Utc>,
}
