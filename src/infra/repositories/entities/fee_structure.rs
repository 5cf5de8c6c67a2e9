//! Fee structures table.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fee_structures")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub class_name: String,
    pub name: String,
    pub amount: i64,
    pub academic_year: String,
    pub status: String,
    pub published_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::domain::FeeStructure {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            class_name: m.class_name,
            name: m.name,
            amount: m.amount,
            academic_year: m.academic_year,
            status: m.status.as_str().into(),
            published_at: m.published_at,
            created_at: m.created_at,
        }
    }
}
