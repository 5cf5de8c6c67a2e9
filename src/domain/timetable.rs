//! Timetable domain entity.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// One period slot on the weekly grid.
///
/// Unique per (class, day, period); a teacher cannot hold two classes
/// in the same slot. Both checks happen in the service before insert.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TimetableEntry {
    pub id: Uuid,
    pub class_name: String,
    /// 0 = Monday .. 6 = Sunday
    #[schema(example = 0)]
    pub day_of_week: i16,
    /// 1-based period number within the day
    #[schema(example = 3)]
    pub period: i16,
    pub subject: String,
    pub teacher_id: Uuid,
}
