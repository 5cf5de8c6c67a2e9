//! Exams table.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "exams")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub class_name: String,
    pub subject: String,
    pub date: Date,
    pub max_marks: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::domain::Exam {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            class_name: m.class_name,
            subject: m.subject,
            date: m.date,
            max_marks: m.max_marks,
            created_at: m.created_at,
        }
    }
}
