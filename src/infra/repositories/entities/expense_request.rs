//! Expense requests table.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expense_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub requested_by: Uuid,
    pub description: String,
    pub amount: i64,
    pub status: String,
    pub decided_by: Option<Uuid>,
    pub decided_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::domain::ExpenseRequest {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            requested_by: m.requested_by,
            description: m.description,
            amount: m.amount,
            status: m.status.as_str().into(),
            decided_by: m.decided_by,
            decided_at: m.decided_at,
            created_at: m.created_at,
        }
    }
}
