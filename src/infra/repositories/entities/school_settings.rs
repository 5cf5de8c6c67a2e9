//! Settings table (single row).

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub school_name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub academic_year: String,
    pub currency: String,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::domain::SchoolSettings {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            school_name: m.school_name,
            address: m.address,
            phone: m.phone,
            email: m.email,
            academic_year: m.academic_year,
            currency: m.currency,
            updated_at: m.updated_at,
        }
    }
}
