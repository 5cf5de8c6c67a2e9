//! Attendance records table. Unique per (student_id, date).

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attendance_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub student_id: Uuid,
    pub class_name: String,
    pub date: Date,
    pub status: String,
    pub recorded_by: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::domain::AttendanceRecord {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            student_id: m.student_id,
            class_name: m.class_name,
            date: m.date,
            status: m.status.as_str().into(),
            recorded_by: m.recorded_by,
        }
    }
}
