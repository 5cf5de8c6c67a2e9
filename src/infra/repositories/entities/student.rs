//! Students table.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub admission_no: String,
    pub first_name: String,
    pub last_name: String,
    pub class_name: String,
    pub section: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub total_fees: i64,
    pub paid_fees: i64,
    pub fee_balance: i64,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::domain::Student {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            admission_no: m.admission_no,
            first_name: m.first_name,
            last_name: m.last_name,
            class_name: m.class_name,
            section: m.section,
            guardian_name: m.guardian_name,
            guardian_phone: m.guardian_phone,
            total_fees: m.total_fees,
            paid_fees: m.paid_fees,
            fee_balance: m.fee_balance,
            status: m.status.as_str().into(),
            created_at: m.created_at,
            updated_at: m.updated_at,
            deleted_at: m.deleted_at,
        }
    }
}
