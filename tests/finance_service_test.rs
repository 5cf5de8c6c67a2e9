//! Finance service unit tests: accounts, ledger postings, expenses
//! and payroll.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use mockall::predicate::eq;
use uuid::Uuid;

use schoolhouse::domain::{
    Account, AccountKind, ExpenseRequest, ExpenseStatus, JournalEntry, PayrollEntry,
    PayrollStatus, TransactionLine,
};
use schoolhouse::errors::{AppError, AppResult};
use schoolhouse::infra::{
    AttendanceRepository, AuditRepository, ExamRepository, FeeRepository, FinanceRepository,
    MockAttendanceRepository, MockAuditRepository, MockExamRepository, MockFeeRepository,
    MockFinanceRepository, MockRoleRepository, MockSettingsRepository, MockStudentRepository,
    MockTeacherRepository, MockTimetableRepository, MockUserRepository, NewAccount, NewExpense,
    RoleRepository, SettingsRepository, StudentRepository, TeacherRepository,
    TimetableRepository, TransactionContext, UnitOfWork, UserRepository,
};
use schoolhouse::services::{FinanceManager, FinanceService};

fn test_account(id: Uuid, code: &str) -> Account {
    Account {
        id,
        code: code.to_string(),
        name: "Cash on hand".to_string(),
        kind: AccountKind::Asset,
        balance: 0,
        created_at: Utc::now(),
    }
}

fn test_entry(transaction_id: Uuid, debit: i64, credit: i64) -> JournalEntry {
    JournalEntry {
        id: Uuid::new_v4(),
        transaction_id,
        account_id: Uuid::new_v4(),
        debit,
        credit,
        memo: None,
        posted_by: Uuid::new_v4(),
        created_at: Utc::now(),
    }
}

fn test_expense(id: Uuid, status: ExpenseStatus) -> ExpenseRequest {
    ExpenseRequest {
        id,
        requested_by: Uuid::new_v4(),
        description: "Projector bulb".to_string(),
        amount: 45_000,
        status,
        decided_by: None,
        decided_at: None,
        created_at: Utc::now(),
    }
}

fn test_payroll(id: Uuid, status: PayrollStatus) -> PayrollEntry {
    PayrollEntry {
        id,
        teacher_id: Uuid::new_v4(),
        period: "2026-08".to_string(),
        base_salary: 500_000,
        allowances: 0,
        deductions: 0,
        net_pay: 500_000,
        status,
        paid_at: None,
        created_at: Utc::now(),
    }
}

/// Test mock for UnitOfWork backed by mockall repositories.
#[derive(Default)]
struct TestUnitOfWork {
    users: Arc<MockUserRepository>,
    roles: Arc<MockRoleRepository>,
    students: Arc<MockStudentRepository>,
    teachers: Arc<MockTeacherRepository>,
    attendance: Arc<MockAttendanceRepository>,
    exams: Arc<MockExamRepository>,
    fees: Arc<MockFeeRepository>,
    timetable: Arc<MockTimetableRepository>,
    settings: Arc<MockSettingsRepository>,
    finance: Arc<MockFinanceRepository>,
    audit: Arc<MockAuditRepository>,
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn roles(&self) -> Arc<dyn RoleRepository> {
        self.roles.clone()
    }

    fn students(&self) -> Arc<dyn StudentRepository> {
        self.students.clone()
    }

    fn teachers(&self) -> Arc<dyn TeacherRepository> {
        self.teachers.clone()
    }

    fn attendance(&self) -> Arc<dyn AttendanceRepository> {
        self.attendance.clone()
    }

    fn exams(&self) -> Arc<dyn ExamRepository> {
        self.exams.clone()
    }

    fn fees(&self) -> Arc<dyn FeeRepository> {
        self.fees.clone()
    }

    fn timetable(&self) -> Arc<dyn TimetableRepository> {
        self.timetable.clone()
    }

    fn settings(&self) -> Arc<dyn SettingsRepository> {
        self.settings.clone()
    }

    fn finance(&self) -> Arc<dyn FinanceRepository> {
        self.finance.clone()
    }

    fn audit(&self) -> Arc<dyn AuditRepository> {
        self.audit.clone()
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        // Transaction not supported in test mock
        Err(AppError::internal("Transactions not supported in test mock"))
    }

    async fn transaction_serializable<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        // Transaction not supported in test mock
        Err(AppError::internal("Transactions not supported in test mock"))
    }
}

fn service_with(finance: MockFinanceRepository) -> FinanceManager<TestUnitOfWork> {
    let uow = TestUnitOfWork {
        finance: Arc::new(finance),
        ..Default::default()
    };
    FinanceManager::new(Arc::new(uow))
}

#[tokio::test]
async fn test_create_account_rejects_empty_code() {
    let finance = MockFinanceRepository::new();

    let result = service_with(finance)
        .create_account(NewAccount {
            code: String::new(),
            name: "Cash on hand".to_string(),
            kind: AccountKind::Asset,
            opening_balance: 0,
        })
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn test_create_account_rejects_duplicate_code() {
    let mut finance = MockFinanceRepository::new();
    finance
        .expect_find_account_by_code()
        .returning(|code| Ok(Some(test_account(Uuid::new_v4(), code))));
    finance.expect_create_account().never();

    let result = service_with(finance)
        .create_account(NewAccount {
            code: "1010".to_string(),
            name: "Cash on hand".to_string(),
            kind: AccountKind::Asset,
            opening_balance: 0,
        })
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
}

#[tokio::test]
async fn test_create_account_success() {
    let mut finance = MockFinanceRepository::new();
    finance
        .expect_find_account_by_code()
        .returning(|_| Ok(None));
    finance
        .expect_create_account()
        .returning(|new| Ok(test_account(Uuid::new_v4(), &new.code)));

    let result = service_with(finance)
        .create_account(NewAccount {
            code: "1010".to_string(),
            name: "Cash on hand".to_string(),
            kind: AccountKind::Asset,
            opening_balance: 0,
        })
        .await;

    assert_eq!(result.unwrap().code, "1010");
}

#[tokio::test]
async fn test_post_transaction_rejects_single_line() {
    let finance = MockFinanceRepository::new();

    let lines = vec![TransactionLine {
        account_id: Uuid::new_v4(),
        debit: 10_000,
        credit: 0,
        memo: None,
    }];
    let result = service_with(finance)
        .post_transaction(lines, Uuid::new_v4())
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn test_post_transaction_rejects_unbalanced_lines() {
    let finance = MockFinanceRepository::new();

    let lines = vec![
        TransactionLine {
            account_id: Uuid::new_v4(),
            debit: 10_000,
            credit: 0,
            memo: None,
        },
        TransactionLine {
            account_id: Uuid::new_v4(),
            debit: 0,
            credit: 9_000,
            memo: None,
        },
    ];
    let result = service_with(finance)
        .post_transaction(lines, Uuid::new_v4())
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn test_post_transaction_rejects_line_with_both_sides() {
    let finance = MockFinanceRepository::new();

    let lines = vec![
        TransactionLine {
            account_id: Uuid::new_v4(),
            debit: 10_000,
            credit: 10_000,
            memo: None,
        },
        TransactionLine {
            account_id: Uuid::new_v4(),
            debit: 0,
            credit: 10_000,
            memo: None,
        },
    ];
    let result = service_with(finance)
        .post_transaction(lines, Uuid::new_v4())
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn test_post_transaction_rejects_oversized_amounts() {
    let finance = MockFinanceRepository::new();

    // Two i64::MAX debits wrap to -2 if summed naively; the validator
    // must reject the amounts before anything touches the database.
    let lines = vec![
        TransactionLine {
            account_id: Uuid::new_v4(),
            debit: i64::MAX,
            credit: 0,
            memo: None,
        },
        TransactionLine {
            account_id: Uuid::new_v4(),
            debit: i64::MAX,
            credit: 0,
            memo: None,
        },
        TransactionLine {
            account_id: Uuid::new_v4(),
            debit: 0,
            credit: 1,
            memo: None,
        },
    ];
    let result = service_with(finance)
        .post_transaction(lines, Uuid::new_v4())
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn test_list_transactions_groups_journal_lines() {
    let txn_a = Uuid::new_v4();
    let txn_b = Uuid::new_v4();

    let mut finance = MockFinanceRepository::new();
    finance.expect_list_journal().returning(move |_| {
        Ok(vec![
            test_entry(txn_a, 10_000, 0),
            test_entry(txn_a, 0, 10_000),
            test_entry(txn_b, 5_000, 0),
            test_entry(txn_b, 0, 5_000),
        ])
    });

    let transactions = service_with(finance)
        .list_transactions(None)
        .await
        .unwrap();

    assert_eq!(transactions.len(), 2);
    let first = &transactions[0];
    assert_eq!(first.transaction_id, txn_a);
    assert_eq!(first.lines.len(), 2);
    assert_eq!(first.total_debit, 10_000);
    assert_eq!(first.total_credit, 10_000);
}

#[tokio::test]
async fn test_create_expense_rejects_non_positive_amount() {
    let finance = MockFinanceRepository::new();

    let result = service_with(finance)
        .create_expense(NewExpense {
            requested_by: Uuid::new_v4(),
            description: "Projector bulb".to_string(),
            amount: 0,
        })
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn test_decide_expense_rejects_already_decided() {
    let expense_id = Uuid::new_v4();

    let mut finance = MockFinanceRepository::new();
    finance
        .expect_find_expense()
        .with(eq(expense_id))
        .returning(|id| Ok(Some(test_expense(id, ExpenseStatus::Approved))));
    finance.expect_decide_expense().never();

    let result = service_with(finance)
        .decide_expense(expense_id, false, Uuid::new_v4())
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn test_decide_expense_approves_pending_request() {
    let expense_id = Uuid::new_v4();

    let mut finance = MockFinanceRepository::new();
    finance
        .expect_find_expense()
        .returning(|id| Ok(Some(test_expense(id, ExpenseStatus::Pending))));
    finance
        .expect_decide_expense()
        .withf(|_, status, _| *status == ExpenseStatus::Approved)
        .returning(|id, status, decided_by| {
            let mut expense = test_expense(id, status);
            expense.decided_by = Some(decided_by);
            expense.decided_at = Some(Utc::now());
            Ok(expense)
        });

    let result = service_with(finance)
        .decide_expense(expense_id, true, Uuid::new_v4())
        .await
        .unwrap();

    assert_eq!(result.status, ExpenseStatus::Approved);
    assert!(result.decided_by.is_some());
}

#[tokio::test]
async fn test_decide_expense_propagates_lost_decision_race() {
    // The pre-check sees a pending request, but another decision lands
    // first and the status-guarded update matches no rows.
    let expense_id = Uuid::new_v4();

    let mut finance = MockFinanceRepository::new();
    finance
        .expect_find_expense()
        .returning(|id| Ok(Some(test_expense(id, ExpenseStatus::Pending))));
    finance
        .expect_decide_expense()
        .returning(|_, _, _| Err(AppError::validation("Expense request is already decided")));

    let result = service_with(finance)
        .decide_expense(expense_id, true, Uuid::new_v4())
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn test_generate_payroll_rejects_bad_period() {
    let finance = MockFinanceRepository::new();

    let result = service_with(finance)
        .generate_payroll("August 2026".to_string())
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn test_mark_payroll_paid_rejects_paid_entry() {
    let entry_id = Uuid::new_v4();

    let mut finance = MockFinanceRepository::new();
    finance
        .expect_find_payroll()
        .returning(|id| Ok(Some(test_payroll(id, PayrollStatus::Paid))));
    finance.expect_mark_payroll_paid().never();

    let result = service_with(finance).mark_payroll_paid(entry_id).await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn test_mark_payroll_paid_success() {
    let entry_id = Uuid::new_v4();

    let mut finance = MockFinanceRepository::new();
    finance
        .expect_find_payroll()
        .returning(|id| Ok(Some(test_payroll(id, PayrollStatus::Pending))));
    finance.expect_mark_payroll_paid().returning(|id| {
        let mut entry = test_payroll(id, PayrollStatus::Paid);
        entry.paid_at = Some(Utc::now());
        Ok(entry)
    });

    let result = service_with(finance).mark_payroll_paid(entry_id).await.unwrap();

    assert_eq!(result.status, PayrollStatus::Paid);
    assert!(result.paid_at.is_some());
}
