//! Finance: general ledger, expense requests and payroll.
//!
//! Postings are validated before any write, then inserted together with
//! the resulting balance updates in a serializable transaction.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    is_valid_period, validate_transaction, Account, ExpenseRequest, ExpenseStatus,
    LedgerTransaction, PayrollEntry, PayrollStatus, TransactionLine,
};
use crate::errors::{AppError, AppResult};
use crate::infra::{NewAccount, NewExpense, UnitOfWork};

/// Outcome of generating payroll for a period.
#[derive(Debug, Serialize, ToSchema)]
pub struct PayrollRunSummary {
    #[schema(example = "2026-08")]
    pub period: String,
    /// Entries created by this run
    pub created: usize,
    /// Teachers that already had an entry for the period
    pub skipped: usize,
    pub entries: Vec<PayrollEntry>,
}

/// Finance service trait for dependency injection.
#[async_trait]
pub trait FinanceService: Send + Sync {
    async fn get_account(&self, id: Uuid) -> AppResult<Account>;

    async fn list_accounts(&self) -> AppResult<Vec<Account>>;

    async fn create_account(&self, new: NewAccount) -> AppResult<Account>;

    /// Post a balanced set of journal lines and move the balances
    async fn post_transaction(
        &self,
        lines: Vec<TransactionLine>,
        posted_by: Uuid,
    ) -> AppResult<LedgerTransaction>;

    /// Journal lines grouped into transactions, optionally per account
    async fn list_transactions(&self, account_id: Option<Uuid>)
        -> AppResult<Vec<LedgerTransaction>>;

    async fn create_expense(&self, new: NewExpense) -> AppResult<ExpenseRequest>;

    async fn list_expenses(&self, status: Option<ExpenseStatus>) -> AppResult<Vec<ExpenseRequest>>;

    /// Approve or reject a pending expense request
    async fn decide_expense(
        &self,
        id: Uuid,
        approve: bool,
        decided_by: Uuid,
    ) -> AppResult<ExpenseRequest>;

    /// Create pending payroll entries for all active teachers
    async fn generate_payroll(&self, period: String) -> AppResult<PayrollRunSummary>;

    async fn list_payroll(&self, period: Option<String>) -> AppResult<Vec<PayrollEntry>>;

    async fn mark_payroll_paid(&self, id: Uuid) -> AppResult<PayrollEntry>;
}

/// Concrete implementation of FinanceService using Unit of Work.
pub struct FinanceManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> FinanceManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> FinanceService for FinanceManager<U> {
    async fn get_account(&self, id: Uuid) -> AppResult<Account> {
        self.uow
            .finance()
            .find_account(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn list_accounts(&self) -> AppResult<Vec<Account>> {
        self.uow.finance().list_accounts().await
    }

    async fn create_account(&self, new: NewAccount) -> AppResult<Account> {
        if new.code.is_empty() {
            return Err(AppError::validation("code must not be empty"));
        }
        if self
            .uow
            .finance()
            .find_account_by_code(&new.code)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Account"));
        }

        self.uow.finance().create_account(new).await
    }

    async fn post_transaction(
        &self,
        lines: Vec<TransactionLine>,
        posted_by: Uuid,
    ) -> AppResult<LedgerTransaction> {
        validate_transaction(&lines)?;

        self.uow
            .transaction_serializable(move |ctx| {
                Box::pin(async move {
                    let transaction_id = Uuid::new_v4();
                    let mut entries = Vec::with_capacity(lines.len());

                    for line in lines {
                        let account = ctx
                            .ledger()
                            .find_account(line.account_id)
                            .await?
                            .ok_or_else(|| {
                                AppError::validation(format!(
                                    "Account {} does not exist",
                                    line.account_id
                                ))
                            })?;

                        let entry = ctx
                            .ledger()
                            .insert_line(
                                transaction_id,
                                line.account_id,
                                line.debit,
                                line.credit,
                                line.memo,
                                posted_by,
                            )
                            .await?;

                        let delta = account.kind.signed_delta(line.debit, line.credit);
                        let balance = account.balance.checked_add(delta).ok_or_else(|| {
                            AppError::validation(format!(
                                "Posting would overflow the balance of account {}",
                                account.code
                            ))
                        })?;
                        ctx.ledger().set_account_balance(account.id, balance).await?;

                        entries.push(entry);
                    }

                    tracing::info!(%transaction_id, lines = entries.len(), "ledger posting committed");

                    let mut grouped = LedgerTransaction::group(entries);
                    // One transaction id in, one group out
                    grouped
                        .pop()
                        .ok_or_else(|| AppError::internal("Posting produced no lines"))
                })
            })
            .await
    }

    async fn list_transactions(
        &self,
        account_id: Option<Uuid>,
    ) -> AppResult<Vec<LedgerTransaction>> {
        let entries = self.uow.finance().list_journal(account_id).await?;
        Ok(LedgerTransaction::group(entries))
    }

    async fn create_expense(&self, new: NewExpense) -> AppResult<ExpenseRequest> {
        if new.amount <= 0 {
            return Err(AppError::validation("amount must be positive"));
        }
        if new.description.is_empty() {
            return Err(AppError::validation("description must not be empty"));
        }

        self.uow.finance().create_expense(new).await
    }

    async fn list_expenses(&self, status: Option<ExpenseStatus>) -> AppResult<Vec<ExpenseRequest>> {
        self.uow.finance().list_expenses(status).await
    }

    async fn decide_expense(
        &self,
        id: Uuid,
        approve: bool,
        decided_by: Uuid,
    ) -> AppResult<ExpenseRequest> {
        let expense = self
            .uow
            .finance()
            .find_expense(id)
            .await?
            .ok_or(AppError::NotFound)?;

        if expense.status != ExpenseStatus::Pending {
            return Err(AppError::validation("Expense request is already decided"));
        }

        let status = if approve {
            ExpenseStatus::Approved
        } else {
            ExpenseStatus::Rejected
        };

        // Approval changes status only; money leaves via an explicit
        // ledger posting.
        self.uow.finance().decide_expense(id, status, decided_by).await
    }

    async fn generate_payroll(&self, period: String) -> AppResult<PayrollRunSummary> {
        if !is_valid_period(&period) {
            return Err(AppError::validation("period must be formatted YYYY-MM"));
        }

        let teachers = self.uow.teachers().list_active().await?;

        self.uow
            .transaction_serializable(move |ctx| {
                Box::pin(async move {
                    let mut entries = Vec::new();
                    let mut skipped = 0;

                    for teacher in &teachers {
                        if ctx.payroll().exists(teacher.id, &period).await? {
                            skipped += 1;
                            continue;
                        }

                        let entry = ctx
                            .payroll()
                            .insert(teacher.id, period.clone(), teacher.salary, 0, 0)
                            .await?;
                        entries.push(entry);
                    }

                    tracing::info!(
                        %period,
                        created = entries.len(),
                        skipped,
                        "payroll run finished"
                    );

                    Ok(PayrollRunSummary {
                        period,
                        created: entries.len(),
                        skipped,
                        entries,
                    })
                })
            })
            .await
    }

    async fn list_payroll(&self, period: Option<String>) -> AppResult<Vec<PayrollEntry>> {
        self.uow.finance().list_payroll(period).await
    }

    async fn mark_payroll_paid(&self, id: Uuid) -> AppResult<PayrollEntry> {
        let entry = self
            .uow
            .finance()
            .find_payroll(id)
            .await?
            .ok_or(AppError::NotFound)?;

        if entry.status == PayrollStatus::Paid {
            return Err(AppError::validation("Payroll entry is already paid"));
        }

        self.uow.finance().mark_payroll_paid(id).await
    }
}
