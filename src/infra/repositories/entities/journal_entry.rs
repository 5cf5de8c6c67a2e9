//! Journal entries table. Lines of one posting share a transaction_id.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "journal_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub transaction_id: Uuid,
    pub account_id: Uuid,
    pub debit: i64,
    pub credit: i64,
    pub memo: Option<String>,
    pub posted_by: Uuid,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::domain::JournalEntry {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            transaction_id: m.transaction_id,
            account_id: m.account_id,
            debit: m.debit,
            credit: m.credit,
            memo: m.memo,
            posted_by: m.posted_by,
            created_at: m.created_at,
        }
    }
}
