//! Fee payments table.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fee_payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub student_id: Uuid,
    pub amount: i64,
    pub method: String,
    pub reference: Option<String>,
    pub note: Option<String>,
    pub received_by: Uuid,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::domain::FeePayment {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            student_id: m.student_id,
            amount: m.amount,
            method: m.method,
            reference: m.reference,
            note: m.note,
            received_by: m.received_by,
            created_at: m.created_at,
        }
    }
}
