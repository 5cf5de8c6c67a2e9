//! General ledger, expense and payroll domain types.
//!
//! The ledger is double-entry: a transaction is a group of journal lines
//! sharing a transaction id, and it may only be posted when total debits
//! equal total credits. Account balances are derived state, mutated in the
//! same database transaction that inserts the lines.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::Money;
use crate::errors::{AppError, AppResult};

/// Chart-of-accounts classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Asset,
    Liability,
    Equity,
    Income,
    Expense,
}

impl AccountKind {
    /// Balance change for a line against this account.
    ///
    /// Asset and expense accounts carry a debit-normal balance; the
    /// other kinds are credit-normal.
    pub fn signed_delta(&self, debit: Money, credit: Money) -> Money {
        match self {
            AccountKind::Asset | AccountKind::Expense => debit - credit,
            AccountKind::Liability | AccountKind::Equity | AccountKind::Income => credit - debit,
        }
    }
}

impl From<&str> for AccountKind {
    fn from(s: &str) -> Self {
        match s {
            "liability" => AccountKind::Liability,
            "equity" => AccountKind::Equity,
            "income" => AccountKind::Income,
            "expense" => AccountKind::Expense,
            _ => AccountKind::Asset,
        }
    }
}

impl std::fmt::Display for AccountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AccountKind::Asset => "asset",
            AccountKind::Liability => "liability",
            AccountKind::Equity => "equity",
            AccountKind::Income => "income",
            AccountKind::Expense => "expense",
        };
        write!(f, "{}", s)
    }
}

/// Ledger account
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Account {
    pub id: Uuid,
    /// Unique short code, e.g. "1010"
    #[schema(example = "1010")]
    pub code: String,
    #[schema(example = "Cash on hand")]
    pub name: String,
    pub kind: AccountKind,
    /// Current balance in the account's normal direction, minor units
    pub balance: Money,
    pub created_at: DateTime<Utc>,
}

/// One side of a ledger posting as submitted by the client.
/// Exactly one of debit/credit must be positive, the other zero.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct TransactionLine {
    pub account_id: Uuid,
    #[serde(default)]
    pub debit: Money,
    #[serde(default)]
    pub credit: Money,
    pub memo: Option<String>,
}

/// A stored journal line.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JournalEntry {
    pub id: Uuid,
    /// Groups the lines of one posting
    pub transaction_id: Uuid,
    pub account_id: Uuid,
    pub debit: Money,
    pub credit: Money,
    pub memo: Option<String>,
    pub posted_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A posting as returned by the API: grouped lines.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LedgerTransaction {
    pub transaction_id: Uuid,
    pub lines: Vec<JournalEntry>,
    pub total_debit: Money,
    pub total_credit: Money,
    pub posted_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl LedgerTransaction {
    /// Group raw journal lines (ordered by created_at) into transactions.
    pub fn group(entries: Vec<JournalEntry>) -> Vec<LedgerTransaction> {
        let mut out: Vec<LedgerTransaction> = Vec::new();
        for entry in entries {
            match out
                .iter_mut()
                .find(|t| t.transaction_id == entry.transaction_id)
            {
                Some(txn) => {
                    txn.total_debit = txn.total_debit.saturating_add(entry.debit);
                    txn.total_credit = txn.total_credit.saturating_add(entry.credit);
                    txn.lines.push(entry);
                }
                None => out.push(LedgerTransaction {
                    transaction_id: entry.transaction_id,
                    total_debit: entry.debit,
                    total_credit: entry.credit,
                    posted_by: entry.posted_by,
                    created_at: entry.created_at,
                    lines: vec![entry],
                }),
            }
        }
        out
    }
}

/// Largest amount accepted on a single journal line, minor units.
/// Keeps client-supplied postings far away from i64 overflow.
pub const MAX_LINE_AMOUNT: Money = 1_000_000_000_000;

/// Validate a candidate posting before anything touches the database.
///
/// Rules: at least two lines; every line has exactly one positive side
/// no larger than [`MAX_LINE_AMOUNT`]; total debits equal total credits.
/// Totals are summed in i128 so crafted amounts cannot wrap the check.
pub fn validate_transaction(lines: &[TransactionLine]) -> AppResult<()> {
    if lines.len() < 2 {
        return Err(AppError::validation(
            "A transaction needs at least two lines",
        ));
    }

    let mut total_debit: i128 = 0;
    let mut total_credit: i128 = 0;

    for (i, line) in lines.iter().enumerate() {
        if line.debit < 0 || line.credit < 0 {
            return Err(AppError::validation(format!(
                "Line {}: amounts must not be negative",
                i + 1
            )));
        }
        if line.debit > MAX_LINE_AMOUNT || line.credit > MAX_LINE_AMOUNT {
            return Err(AppError::validation(format!(
                "Line {}: amount exceeds the maximum of {}",
                i + 1,
                MAX_LINE_AMOUNT
            )));
        }
        match (line.debit > 0, line.credit > 0) {
            (true, false) | (false, true) => {}
            _ => {
                return Err(AppError::validation(format!(
                    "Line {}: exactly one of debit or credit must be positive",
                    i + 1
                )));
            }
        }
        total_debit += i128::from(line.debit);
        total_credit += i128::from(line.credit);
    }

    if total_debit != total_credit {
        return Err(AppError::validation(format!(
            "Transaction is unbalanced: debits {} != credits {}",
            total_debit, total_credit
        )));
    }

    Ok(())
}

/// Expense request status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseStatus {
    Pending,
    Approved,
    Rejected,
}

impl From<&str> for ExpenseStatus {
    fn from(s: &str) -> Self {
        match s {
            "approved" => ExpenseStatus::Approved,
            "rejected" => ExpenseStatus::Rejected,
            _ => ExpenseStatus::Pending,
        }
    }
}

impl std::fmt::Display for ExpenseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ExpenseStatus::Pending => "pending",
            ExpenseStatus::Approved => "approved",
            ExpenseStatus::Rejected => "rejected",
        };
        write!(f, "{}", s)
    }
}

/// A spend request awaiting approval. Approval is a status change only;
/// the ledger is updated by an explicit posting.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExpenseRequest {
    pub id: Uuid,
    pub requested_by: Uuid,
    pub description: String,
    pub amount: Money,
    pub status: ExpenseStatus,
    pub decided_by: Option<Uuid>,
    pub decided_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Payroll entry status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PayrollStatus {
    Pending,
    Paid,
}

impl From<&str> for PayrollStatus {
    fn from(s: &str) -> Self {
        match s {
            "paid" => PayrollStatus::Paid,
            _ => PayrollStatus::Pending,
        }
    }
}

impl std::fmt::Display for PayrollStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PayrollStatus::Pending => "pending",
            PayrollStatus::Paid => "paid",
        };
        write!(f, "{}", s)
    }
}

/// One teacher's pay for one period ("YYYY-MM"). Unique per (teacher, period).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PayrollEntry {
    pub id: Uuid,
    pub teacher_id: Uuid,
    #[schema(example = "2026-08")]
    pub period: String,
    pub base_salary: Money,
    pub allowances: Money,
    pub deductions: Money,
    /// base + allowances - deductions
    pub net_pay: Money,
    pub status: PayrollStatus,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl PayrollEntry {
    pub fn compute_net(base: Money, allowances: Money, deductions: Money) -> Money {
        base + allowances - deductions
    }
}

/// Check a period string is "YYYY-MM" with a sane month.
pub fn is_valid_period(period: &str) -> bool {
    let Some((year, month)) = period.split_once('-') else {
        return false;
    };
    year.len() == 4
        && year.chars().all(|c| c.is_ascii_digit())
        && matches!(month.parse::<u8>(), Ok(1..=12))
        && month.len() == 2
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(debit: Money, credit: Money) -> TransactionLine {
        TransactionLine {
            account_id: Uuid::new_v4(),
            debit,
            credit,
            memo: None,
        }
    }

    #[test]
    fn balanced_transaction_passes() {
        let lines = vec![line(10_000, 0), line(0, 10_000)];
        assert!(validate_transaction(&lines).is_ok());
    }

    #[test]
    fn split_posting_passes() {
        let lines = vec![line(7_000, 0), line(3_000, 0), line(0, 10_000)];
        assert!(validate_transaction(&lines).is_ok());
    }

    #[test]
    fn unbalanced_transaction_fails() {
        let lines = vec![line(10_000, 0), line(0, 9_999)];
        assert!(validate_transaction(&lines).is_err());
    }

    #[test]
    fn single_line_fails() {
        assert!(validate_transaction(&[line(10_000, 0)]).is_err());
    }

    #[test]
    fn line_with_both_sides_fails() {
        let lines = vec![line(5_000, 5_000), line(0, 0)];
        assert!(validate_transaction(&lines).is_err());
    }

    #[test]
    fn zero_line_fails() {
        let lines = vec![line(10_000, 0), line(0, 10_000), line(0, 0)];
        assert!(validate_transaction(&lines).is_err());
    }

    #[test]
    fn negative_amount_fails() {
        let lines = vec![line(-5, 0), line(0, -5)];
        assert!(validate_transaction(&lines).is_err());
    }

    #[test]
    fn oversized_amount_fails() {
        let lines = vec![line(MAX_LINE_AMOUNT + 1, 0), line(0, MAX_LINE_AMOUNT + 1)];
        assert!(validate_transaction(&lines).is_err());
    }

    #[test]
    fn extreme_amounts_are_rejected_without_wrapping() {
        // i64::MAX + i64::MAX wraps to -2; the per-line cap must fire first.
        let lines = vec![line(i64::MAX, 0), line(i64::MAX, 0), line(0, 1)];
        let err = validate_transaction(&lines).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let lines = vec![line(MAX_LINE_AMOUNT, 0), line(MAX_LINE_AMOUNT, 0), line(0, 1)];
        assert!(validate_transaction(&lines).is_err());
    }

    #[test]
    fn signed_delta_respects_normal_side() {
        // Debit increases an asset, decreases income
        assert_eq!(AccountKind::Asset.signed_delta(100, 0), 100);
        assert_eq!(AccountKind::Income.signed_delta(100, 0), -100);
        // Credit increases income and liabilities
        assert_eq!(AccountKind::Income.signed_delta(0, 100), 100);
        assert_eq!(AccountKind::Liability.signed_delta(0, 100), 100);
        assert_eq!(AccountKind::Expense.signed_delta(0, 100), -100);
    }

    #[test]
    fn net_pay_math() {
        assert_eq!(PayrollEntry::compute_net(500_000, 50_000, 25_000), 525_000);
    }

    #[test]
    fn period_format() {
        assert!(is_valid_period("2026-08"));
        assert!(is_valid_period("2026-12"));
        assert!(!is_valid_period("2026-13"));
        assert!(!is_valid_period("2026-8"));
        assert!(!is_valid_period("26-08"));
        assert!(!is_valid_period("garbage"));
    }

    #[test]
    fn grouping_sums_per_transaction() {
        let txn_a = Uuid::new_v4();
        let txn_b = Uuid::new_v4();
        let user = Uuid::new_v4();
        let now = Utc::now();
        let entry = |txn, debit, credit| JournalEntry {
            id: Uuid::new_v4(),
            transaction_id: txn,
            account_id: Uuid::new_v4(),
            debit,
            credit,
            memo: None,
            posted_by: user,
            created_at: now,
        };

        let grouped = LedgerTransaction::group(vec![
            entry(txn_a, 100, 0),
            entry(txn_a, 0, 100),
            entry(txn_b, 50, 0),
            entry(txn_b, 0, 50),
        ]);

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].transaction_id, txn_a);
        assert_eq!(grouped[0].total_debit, 100);
        assert_eq!(grouped[0].total_credit, 100);
        assert_eq!(grouped[1].lines.len(), 2);
    }
}
