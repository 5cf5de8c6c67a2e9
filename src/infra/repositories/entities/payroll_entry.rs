//! Payroll entries table. Unique per (teacher_id, period).

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payroll_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub teacher_id: Uuid,
    pub period: String,
    pub base_salary: i64,
    pub allowances: i64,
    pub deductions: i64,
    pub net_pay: i64,
    pub status: String,
    pub paid_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::domain::PayrollEntry {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            teacher_id: m.teacher_id,
            period: m.period,
            base_salary: m.base_salary,
            allowances: m.allowances,
            deductions: m.deductions,
            net_pay: m.net_pay,
            status: m.status.as_str().into(),
            paid_at: m.paid_at,
            created_at: m.created_at,
        }
    }
}
