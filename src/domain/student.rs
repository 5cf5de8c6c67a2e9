//! Student domain entity.
//!
//! Fee fields are denormalized: `fee_balance` is always recomputed as
//! `total_fees - paid_fees` whenever either side changes. The payments
//! table is the source of truth for `paid_fees`; the reconcile job
//! re-derives both when they drift.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::Money;

/// Enrollment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StudentStatus {
    Active,
    Inactive,
    Graduated,
    Transferred,
}

impl From<&str> for StudentStatus {
    fn from(s: &str) -> Self {
        match s {
            "inactive" => StudentStatus::Inactive,
            "graduated" => StudentStatus::Graduated,
            "transferred" => StudentStatus::Transferred,
            _ => StudentStatus::Active,
        }
    }
}

impl std::fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StudentStatus::Active => "active",
            StudentStatus::Inactive => "inactive",
            StudentStatus::Graduated => "graduated",
            StudentStatus::Transferred => "transferred",
        };
        write!(f, "{}", s)
    }
}

/// Student domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: Uuid,
    /// School-assigned admission number, unique
    pub admission_no: String,
    pub first_name: String,
    pub last_name: String,
    pub class_name: String,
    pub section: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    /// Total fees levied, minor units
    pub total_fees: Money,
    /// Sum of recorded payments, minor units
    pub paid_fees: Money,
    /// total_fees - paid_fees, never negative
    pub fee_balance: Money,
    pub status: StudentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_active(&self) -> bool {
        self.status == StudentStatus::Active && self.deleted_at.is_none()
    }

    /// Recompute the derived balance from the two source fields.
    pub fn recompute_balance(total_fees: Money, paid_fees: Money) -> Money {
        (total_fees - paid_fees).max(0)
    }
}

/// Student response DTO
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StudentResponse {
    pub id: Uuid,
    #[schema(example = "ADM-2026-0042")]
    pub admission_no: String,
    pub first_name: String,
    pub last_name: String,
    #[schema(example = "Grade 7")]
    pub class_name: String,
    pub section: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub total_fees: i64,
    pub paid_fees: i64,
    pub fee_balance: i64,
    pub status: StudentStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Student> for StudentResponse {
    fn from(s: Student) -> Self {
        Self {
            id: s.id,
            admission_no: s.admission_no,
            first_name: s.first_name,
            last_name: s.last_name,
            class_name: s.class_name,
            section: s.section,
            guardian_name: s.guardian_name,
            guardian_phone: s.guardian_phone,
            total_fees: s.total_fees,
            paid_fees: s.paid_fees,
            fee_balance: s.fee_balance,
            status: s.status,
            created_at: s.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_is_total_minus_paid() {
        assert_eq!(Student::recompute_balance(50_000, 20_000), 30_000);
        assert_eq!(Student::recompute_balance(50_000, 50_000), 0);
    }

    #[test]
    fn balance_never_goes_negative() {
        assert_eq!(Student::recompute_balance(10_000, 25_000), 0);
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            StudentStatus::Active,
            StudentStatus::Inactive,
            StudentStatus::Graduated,
            StudentStatus::Transferred,
        ] {
            assert_eq!(StudentStatus::from(status.to_string().as_str()), status);
        }
    }
}
