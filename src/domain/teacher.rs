//! Teacher domain entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::Money;

/// Employment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TeacherStatus {
    Active,
    OnLeave,
    Resigned,
}

impl From<&str> for TeacherStatus {
    fn from(s: &str) -> Self {
        match s {
            "on_leave" => TeacherStatus::OnLeave,
            "resigned" => TeacherStatus::Resigned,
            _ => TeacherStatus::Active,
        }
    }
}

impl std::fmt::Display for TeacherStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TeacherStatus::Active => "active",
            TeacherStatus::OnLeave => "on_leave",
            TeacherStatus::Resigned => "resigned",
        };
        write!(f, "{}", s)
    }
}

/// Teacher domain entity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Teacher {
    pub id: Uuid,
    /// Staff number, unique
    #[schema(example = "STF-017")]
    pub staff_no: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[schema(example = "Mathematics")]
    pub subject: Option<String>,
    /// Monthly base salary, minor units
    pub salary: Money,
    pub status: TeacherStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Teacher {
    pub fn is_active(&self) -> bool {
        self.status == TeacherStatus::Active && self.deleted_at.is_none()
    }
}
