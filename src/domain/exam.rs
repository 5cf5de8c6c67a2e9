//! Exam and result domain types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A scheduled assessment for one class and subject.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Exam {
    pub id: Uuid,
    #[schema(example = "Midterm 2026")]
    pub name: String,
    pub class_name: String,
    pub subject: String,
    pub date: NaiveDate,
    /// Maximum obtainable marks, > 0
    pub max_marks: i32,
    pub created_at: DateTime<Utc>,
}

/// One student's marks in one exam. Unique per (exam, student);
/// re-entering marks overwrites and re-derives the grade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamResult {
    pub id: Uuid,
    pub exam_id: Uuid,
    pub student_id: Uuid,
    pub marks: i32,
    pub grade: String,
}

/// Result row as returned by the API
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ExamResultResponse {
    pub id: Uuid,
    pub exam_id: Uuid,
    pub student_id: Uuid,
    pub marks: i32,
    #[schema(example = "B")]
    pub grade: String,
}

impl From<ExamResult> for ExamResultResponse {
    fn from(r: ExamResult) -> Self {
        Self {
            id: r.id,
            exam_id: r.exam_id,
            student_id: r.student_id,
            marks: r.marks,
            grade: r.grade,
        }
    }
}

/// Derive a letter grade from marks out of max_marks.
///
/// Bands: A+ >= 90%, A >= 80%, B >= 70%, C >= 60%, D >= 50%, else F.
pub fn grade_for(marks: i32, max_marks: i32) -> &'static str {
    if max_marks <= 0 {
        return "F";
    }
    let percent = marks as i64 * 100 / max_marks as i64;
    match percent {
        p if p >= 90 => "A+",
        p if p >= 80 => "A",
        p if p >= 70 => "B",
        p if p >= 60 => "C",
        p if p >= 50 => "D",
        _ => "F",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_bands() {
        assert_eq!(grade_for(90, 100), "A+");
        assert_eq!(grade_for(89, 100), "A");
        assert_eq!(grade_for(70, 100), "B");
        assert_eq!(grade_for(65, 100), "C");
        assert_eq!(grade_for(50, 100), "D");
        assert_eq!(grade_for(49, 100), "F");
        assert_eq!(grade_for(0, 100), "F");
    }

    #[test]
    fn grade_scales_with_max_marks() {
        // 45/50 = 90%
        assert_eq!(grade_for(45, 50), "A+");
        // 27/50 = 54%
        assert_eq!(grade_for(27, 50), "D");
    }

    #[test]
    fn zero_max_marks_is_f() {
        assert_eq!(grade_for(10, 0), "F");
    }
}
