//! Timetable entries table. Unique per (class_name, day_of_week, period).

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "timetable_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub class_name: String,
    pub day_of_week: i16,
    pub period: i16,
    pub subject: String,
    pub teacher_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::domain::TimetableEntry {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            class_name: m.class_name,
            day_of_week: m.day_of_week,
            period: m.period,
            subject: m.subject,
            teacher_id: m.teacher_id,
        }
    }
}
