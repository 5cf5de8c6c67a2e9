//! Fee structure and payment domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::Money;

/// Lifecycle of a fee structure.
///
/// Draft structures are editable and have no effect on students.
/// Publishing applies the amount to every active student of the class;
/// reverting undoes that and returns the structure to draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FeeStructureStatus {
    Draft,
    Published,
}

impl From<&str> for FeeStructureStatus {
    fn from(s: &str) -> Self {
        match s {
            "published" => FeeStructureStatus::Published,
            _ => FeeStructureStatus::Draft,
        }
    }
}

impl std::fmt::Display for FeeStructureStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FeeStructureStatus::Draft => "draft",
            FeeStructureStatus::Published => "published",
        };
        write!(f, "{}", s)
    }
}

/// A fee levied on a class for an academic year.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeeStructure {
    pub id: Uuid,
    pub class_name: String,
    #[schema(example = "Tuition Term 1")]
    pub name: String,
    /// Amount per student, minor units
    pub amount: Money,
    #[schema(example = "2026-2027")]
    pub academic_year: String,
    pub status: FeeStructureStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl FeeStructure {
    pub fn is_published(&self) -> bool {
        self.status == FeeStructureStatus::Published
    }
}

/// A recorded fee payment by a student.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeePayment {
    pub id: Uuid,
    pub student_id: Uuid,
    /// Amount paid, minor units, > 0
    pub amount: Money,
    #[schema(example = "cash")]
    pub method: String,
    /// External reference (cheque no, transfer id)
    pub reference: Option<String>,
    pub note: Option<String>,
    /// User who took the payment
    pub received_by: Uuid,
    pub created_at: DateTime<Utc>,
}
