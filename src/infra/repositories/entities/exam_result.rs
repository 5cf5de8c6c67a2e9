//! Exam results table. Unique per (exam_id, student_id).

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "exam_results")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub exam_id: Uuid,
    pub student_id: Uuid,
    pub marks: i32,
    pub grade: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::domain::ExamResult {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            exam_id: m.exam_id,
            student_id: m.student_id,
            marks: m.marks,
            grade: m.grade,
        }
    }
}
