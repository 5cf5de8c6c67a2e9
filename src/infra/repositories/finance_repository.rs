//! Finance repository: chart of accounts, journal reads, expense
//! requests and payroll.
//!
//! Ledger postings and payroll generation are transactional and live in
//! the Unit of Work; this repository covers reads and the simple writes.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::account::{self, ActiveModel as AccountActiveModel, Entity as AccountEntity};
use super::entities::expense_request::{
    self, ActiveModel as ExpenseActiveModel, Entity as ExpenseEntity,
};
use super::entities::journal_entry::{self, Entity as JournalEntity};
use super::entities::payroll_entry::{self, Entity as PayrollEntity};
use crate::domain::{
    Account, AccountKind, ExpenseRequest, ExpenseStatus, JournalEntry, Money, PayrollEntry,
    PayrollStatus,
};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Fields for creating a ledger account
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub code: String,
    pub name: String,
    pub kind: AccountKind,
    pub opening_balance: Money,
}

/// Fields for filing an expense request
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub requested_by: Uuid,
    pub description: String,
    pub amount: Money,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait FinanceRepository: Send + Sync {
    async fn find_account(&self, id: Uuid) -> AppResult<Option<Account>>;

    async fn find_account_by_code(&self, code: &str) -> AppResult<Option<Account>>;

    async fn list_accounts(&self) -> AppResult<Vec<Account>>;

    async fn create_account(&self, new: NewAccount) -> AppResult<Account>;

    /// Journal lines, oldest first, optionally for one account
    async fn list_journal(&self, account_id: Option<Uuid>) -> AppResult<Vec<JournalEntry>>;

    async fn find_expense(&self, id: Uuid) -> AppResult<Option<ExpenseRequest>>;

    async fn list_expenses(&self, status: Option<ExpenseStatus>) -> AppResult<Vec<ExpenseRequest>>;

    async fn create_expense(&self, new: NewExpense) -> AppResult<ExpenseRequest>;

    /// Approve or reject a pending request
    async fn decide_expense(
        &self,
        id: Uuid,
        status: ExpenseStatus,
        decided_by: Uuid,
    ) -> AppResult<ExpenseRequest>;

    async fn find_payroll(&self, id: Uuid) -> AppResult<Option<PayrollEntry>>;

    async fn list_payroll(&self, period: Option<String>) -> AppResult<Vec<PayrollEntry>>;

    async fn mark_payroll_paid(&self, id: Uuid) -> AppResult<PayrollEntry>;
}

/// Concrete implementation of FinanceRepository
pub struct FinanceStore {
    db: DatabaseConnection,
}

impl FinanceStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FinanceRepository for FinanceStore {
    async fn find_account(&self, id: Uuid) -> AppResult<Option<Account>> {
        let result = AccountEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Account::from))
    }

    async fn find_account_by_code(&self, code: &str) -> AppResult<Option<Account>> {
        let result = AccountEntity::find()
            .filter(account::Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Account::from))
    }

    async fn list_accounts(&self) -> AppResult<Vec<Account>> {
        let models = AccountEntity::find()
            .order_by_asc(account::Column::Code)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Account::from).collect())
    }

    async fn create_account(&self, new: NewAccount) -> AppResult<Account> {
        let active = AccountActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(new.code),
            name: Set(new.name),
            kind: Set(new.kind.to_string()),
            balance: Set(new.opening_balance),
            created_at: Set(chrono::Utc::now()),
        };

        let model = active.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Account::from(model))
    }

    async fn list_journal(&self, account_id: Option<Uuid>) -> AppResult<Vec<JournalEntry>> {
        let mut query = JournalEntity::find();
        if let Some(account_id) = account_id {
            query = query.filter(journal_entry::Column::AccountId.eq(account_id));
        }

        let models = query
            .order_by_asc(journal_entry::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(JournalEntry::from).collect())
    }

    async fn find_expense(&self, id: Uuid) -> AppResult<Option<ExpenseRequest>> {
        let result = ExpenseEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(ExpenseRequest::from))
    }

    async fn list_expenses(&self, status: Option<ExpenseStatus>) -> AppResult<Vec<ExpenseRequest>> {
        let mut query = ExpenseEntity::find();
        if let Some(status) = status {
            query = query.filter(expense_request::Column::Status.eq(status.to_string()));
        }

        let models = query
            .order_by_desc(expense_request::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(ExpenseRequest::from).collect())
    }

    async fn create_expense(&self, new: NewExpense) -> AppResult<ExpenseRequest> {
        let active = ExpenseActiveModel {
            id: Set(Uuid::new_v4()),
            requested_by: Set(new.requested_by),
            description: Set(new.description),
            amount: Set(new.amount),
            status: Set(ExpenseStatus::Pending.to_string()),
            decided_by: Set(None),
            decided_at: Set(None),
            created_at: Set(chrono::Utc::now()),
        };

        let model = active.insert(&self.db).await.map_err(AppError::from)?;
        Ok(ExpenseRequest::from(model))
    }

    async fn decide_expense(
        &self,
        id: Uuid,
        status: ExpenseStatus,
        decided_by: Uuid,
    ) -> AppResult<ExpenseRequest> {
        // Guarded on the pending status so two concurrent decisions
        // cannot both win.
        let result = ExpenseEntity::update_many()
            .col_expr(expense_request::Column::Status, Expr::value(status.to_string()))
            .col_expr(expense_request::Column::DecidedBy, Expr::value(Some(decided_by)))
            .col_expr(
                expense_request::Column::DecidedAt,
                Expr::value(Some(chrono::Utc::now())),
            )
            .filter(expense_request::Column::Id.eq(id))
            .filter(expense_request::Column::Status.eq(ExpenseStatus::Pending.to_string()))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return match self.find_expense(id).await? {
                Some(_) => Err(AppError::validation("Expense request is already decided")),
                None => Err(AppError::NotFound),
            };
        }

        self.find_expense(id).await?.ok_or(AppError::NotFound)
    }

    async fn find_payroll(&self, id: Uuid) -> AppResult<Option<PayrollEntry>> {
        let result = PayrollEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(PayrollEntry::from))
    }

    async fn list_payroll(&self, period: Option<String>) -> AppResult<Vec<PayrollEntry>> {
        let mut query = PayrollEntity::find();
        if let Some(period) = period {
            query = query.filter(payroll_entry::Column::Period.eq(period));
        }

        let models = query
            .order_by_desc(payroll_entry::Column::Period)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(PayrollEntry::from).collect())
    }

    async fn mark_payroll_paid(&self, id: Uuid) -> AppResult<PayrollEntry> {
        // Same guard as expenses: only a pending entry can be paid.
        let result = PayrollEntity::update_many()
            .col_expr(
                payroll_entry::Column::Status,
                Expr::value(PayrollStatus::Paid.to_string()),
            )
            .col_expr(
                payroll_entry::Column::PaidAt,
                Expr::value(Some(chrono::Utc::now())),
            )
            .filter(payroll_entry::Column::Id.eq(id))
            .filter(payroll_entry::Column::Status.eq(PayrollStatus::Pending.to_string()))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return match self.find_payroll(id).await? {
                Some(_) => Err(AppError::validation("Payroll entry is already paid")),
                None => Err(AppError::NotFound),
            };
        }

        self.find_payroll(id).await?.ok_or(AppError::NotFound)
    }
}
