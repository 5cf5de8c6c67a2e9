//! Attendance domain types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Per-day attendance status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Excused,
}

impl From<&str> for AttendanceStatus {
    fn from(s: &str) -> Self {
        match s {
            "absent" => AttendanceStatus::Absent,
            "late" => AttendanceStatus::Late,
            "excused" => AttendanceStatus::Excused,
            _ => AttendanceStatus::Present,
        }
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Late => "late",
            AttendanceStatus::Excused => "excused",
        };
        write!(f, "{}", s)
    }
}

/// One student's attendance on one date. Unique per (student, date);
/// re-marking the same day overwrites.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub student_id: Uuid,
    pub class_name: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    /// User who recorded the mark
    pub recorded_by: Uuid,
}

/// Aggregated counts for one student over a date range
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct AttendanceSummary {
    pub student_id: Uuid,
    pub present: u64,
    pub absent: u64,
    pub late: u64,
    pub excused: u64,
}

impl AttendanceSummary {
    pub fn total(&self) -> u64 {
        self.present + self.absent + self.late + self.excused
    }

    /// Attendance rate in percent; late and excused count as attended.
    pub fn rate_percent(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let attended = self.present + self.late + self.excused;
        attended as f64 * 100.0 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_counts_late_and_excused_as_attended() {
        let summary = AttendanceSummary {
            student_id: Uuid::new_v4(),
            present: 16,
            absent: 2,
            late: 1,
            excused: 1,
        };
        assert_eq!(summary.total(), 20);
        assert!((summary.rate_percent() - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_summary_rate_is_zero() {
        let summary = AttendanceSummary::default();
        assert_eq!(summary.rate_percent(), 0.0);
    }
}
