//! Unit of Work pattern implementation.
//!
//! Centralizes repository access and wraps the workflows that must be
//! atomic: fee payments, fee structure publish/revert, ledger postings
//! and payroll generation. Transactions are committed on success and
//! rolled back on error.

use async_trait::async_trait;
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};
use std::sync::Arc;

use super::repositories::{
    AttendanceRepository, AttendanceStore, AuditRepository, AuditStore, ExamRepository, ExamStore,
    FeeRepository, FeeStore, FinanceRepository, FinanceStore, RoleRepository, RoleStore,
    SettingsRepository, SettingsStore, StudentRepository, StudentStore, TeacherRepository,
    TeacherStore, TimetableRepository, TimetableStore, UserRepository, UserStore,
};
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Note: the generic transaction method makes this trait unmockable;
/// services are tested against mocked repositories instead.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;
    fn roles(&self) -> Arc<dyn RoleRepository>;
    fn students(&self) -> Arc<dyn StudentRepository>;
    fn teachers(&self) -> Arc<dyn TeacherRepository>;
    fn attendance(&self) -> Arc<dyn AttendanceRepository>;
    fn exams(&self) -> Arc<dyn ExamRepository>;
    fn fees(&self) -> Arc<dyn FeeRepository>;
    fn timetable(&self) -> Arc<dyn TimetableRepository>;
    fn settings(&self) -> Arc<dyn SettingsRepository>;
    fn finance(&self) -> Arc<dyn FinanceRepository>;
    fn audit(&self) -> Arc<dyn AuditRepository>;

    /// Execute a closure within a transaction.
    ///
    /// The transaction is committed on success or rolled back on error.
    /// Uses ReadCommitted isolation.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;

    /// Execute a closure within a serializable transaction.
    ///
    /// Used where concurrent postings must not interleave, e.g. ledger
    /// balance updates and payroll generation.
    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;
}

/// Repository access bound to one open transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn students(&self) -> TxStudentRepository<'_> {
        TxStudentRepository::new(self.txn)
    }

    pub fn fees(&self) -> TxFeeRepository<'_> {
        TxFeeRepository::new(self.txn)
    }

    pub fn ledger(&self) -> TxLedgerRepository<'_> {
        TxLedgerRepository::new(self.txn)
    }

    pub fn payroll(&self) -> TxPayrollRepository<'_> {
        TxPayrollRepository::new(self.txn)
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    role_repo: Arc<RoleStore>,
    student_repo: Arc<StudentStore>,
    teacher_repo: Arc<TeacherStore>,
    attendance_repo: Arc<AttendanceStore>,
    exam_repo: Arc<ExamStore>,
    fee_repo: Arc<FeeStore>,
    timetable_repo: Arc<TimetableStore>,
    settings_repo: Arc<SettingsStore>,
    finance_repo: Arc<FinanceStore>,
    audit_repo: Arc<AuditStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            role_repo: Arc::new(RoleStore::new(db.clone())),
            student_repo: Arc::new(StudentStore::new(db.clone())),
            teacher_repo: Arc::new(TeacherStore::new(db.clone())),
            attendance_repo: Arc::new(AttendanceStore::new(db.clone())),
            exam_repo: Arc::new(ExamStore::new(db.clone())),
            fee_repo: Arc::new(FeeStore::new(db.clone())),
            timetable_repo: Arc::new(TimetableStore::new(db.clone())),
            settings_repo: Arc::new(SettingsStore::new(db.clone())),
            finance_repo: Arc::new(FinanceStore::new(db.clone())),
            audit_repo: Arc::new(AuditStore::new(db.clone())),
            db,
        }
    }

    async fn execute_transaction<F, T>(&self, isolation: IsolationLevel, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(Some(isolation), Some(AccessMode::ReadWrite))
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn roles(&self) -> Arc<dyn RoleRepository> {
        self.role_repo.clone()
    }

    fn students(&self) -> Arc<dyn StudentRepository> {
        self.student_repo.clone()
    }

    fn teachers(&self) -> Arc<dyn TeacherRepository> {
        self.teacher_repo.clone()
    }

    fn attendance(&self) -> Arc<dyn AttendanceRepository> {
        self.attendance_repo.clone()
    }

    fn exams(&self) -> Arc<dyn ExamRepository> {
        self.exam_repo.clone()
    }

    fn fees(&self) -> Arc<dyn FeeRepository> {
        self.fee_repo.clone()
    }

    fn timetable(&self) -> Arc<dyn TimetableRepository> {
        self.timetable_repo.clone()
    }

    fn settings(&self) -> Arc<dyn SettingsRepository> {
        self.settings_repo.clone()
    }

    fn finance(&self) -> Arc<dyn FinanceRepository> {
        self.finance_repo.clone()
    }

    fn audit(&self) -> Arc<dyn AuditRepository> {
        self.audit_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::ReadCommitted, f)
            .await
    }

    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::Serializable, f)
            .await
    }
}

/// Transaction-aware student operations used by the fee workflows.
pub struct TxStudentRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxStudentRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Find active student by ID (excludes soft-deleted)
    pub async fn find_by_id(&self, id: uuid::Uuid) -> AppResult<Option<crate::domain::Student>> {
        use super::repositories::entities::student::{self, Entity as StudentEntity};
        use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

        let result = StudentEntity::find_by_id(id)
            .filter(student::Column::DeletedAt.is_null())
            .one(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(crate::domain::Student::from))
    }

    /// Active students of one class; publish/revert iterates this
    pub async fn list_active_by_class(
        &self,
        class_name: &str,
    ) -> AppResult<Vec<crate::domain::Student>> {
        use super::repositories::entities::student::{self, Entity as StudentEntity};
        use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

        let models = StudentEntity::find()
            .filter(student::Column::ClassName.eq(class_name))
            .filter(student::Column::DeletedAt.is_null())
            .filter(
                student::Column::Status.eq(crate::domain::StudentStatus::Active.to_string()),
            )
            .all(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(crate::domain::Student::from).collect())
    }

    /// Overwrite fee totals; the balance is recomputed and clamped at zero
    pub async fn set_fee_totals(
        &self,
        id: uuid::Uuid,
        total_fees: crate::domain::Money,
        paid_fees: crate::domain::Money,
    ) -> AppResult<crate::domain::Student> {
        use super::repositories::entities::student::{self, ActiveModel, Entity as StudentEntity};
        use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

        let model = StudentEntity::find_by_id(id)
            .filter(student::Column::DeletedAt.is_null())
            .one(self.txn)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = model.into();
        active.total_fees = Set(total_fees);
        active.paid_fees = Set(paid_fees);
        active.fee_balance = Set(crate::domain::Student::recompute_balance(
            total_fees, paid_fees,
        ));
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(self.txn).await.map_err(AppError::from)?;
        Ok(crate::domain::Student::from(model))
    }
}

/// Transaction-aware fee operations.
pub struct TxFeeRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxFeeRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub async fn find_structure(
        &self,
        id: uuid::Uuid,
    ) -> AppResult<Option<crate::domain::FeeStructure>> {
        use super::repositories::entities::fee_structure::Entity as StructureEntity;
        use sea_orm::EntityTrait;

        let result = StructureEntity::find_by_id(id)
            .one(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(crate::domain::FeeStructure::from))
    }

    /// Flip a structure between draft and published
    pub async fn set_structure_status(
        &self,
        id: uuid::Uuid,
        status: crate::domain::FeeStructureStatus,
    ) -> AppResult<crate::domain::FeeStructure> {
        use super::repositories::entities::fee_structure::{ActiveModel, Entity as StructureEntity};
        use sea_orm::{ActiveModelTrait, EntityTrait, Set};

        let model = StructureEntity::find_by_id(id)
            .one(self.txn)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = model.into();
        let published = status == crate::domain::FeeStructureStatus::Published;
        active.status = Set(status.to_string());
        active.published_at = Set(published.then(chrono::Utc::now));

        let model = active.update(self.txn).await.map_err(AppError::from)?;
        Ok(crate::domain::FeeStructure::from(model))
    }

    pub async fn insert_payment(
        &self,
        student_id: uuid::Uuid,
        amount: crate::domain::Money,
        method: String,
        reference: Option<String>,
        note: Option<String>,
        received_by: uuid::Uuid,
    ) -> AppResult<crate::domain::FeePayment> {
        use super::repositories::entities::fee_payment::ActiveModel;
        use sea_orm::{ActiveModelTrait, Set};

        let active = ActiveModel {
            id: Set(uuid::Uuid::new_v4()),
            student_id: Set(student_id),
            amount: Set(amount),
            method: Set(method),
            reference: Set(reference),
            note: Set(note),
            received_by: Set(received_by),
            created_at: Set(chrono::Utc::now()),
        };

        let model = active.insert(self.txn).await.map_err(AppError::from)?;
        Ok(crate::domain::FeePayment::from(model))
    }
}

/// Transaction-aware ledger operations. Every posting inserts its lines
/// and moves the account balances inside one transaction.
pub struct TxLedgerRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxLedgerRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub async fn find_account(&self, id: uuid::Uuid) -> AppResult<Option<crate::domain::Account>> {
        use super::repositories::entities::account::Entity as AccountEntity;
        use sea_orm::EntityTrait;

        let result = AccountEntity::find_by_id(id)
            .one(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(crate::domain::Account::from))
    }

    pub async fn insert_line(
        &self,
        transaction_id: uuid::Uuid,
        account_id: uuid::Uuid,
        debit: crate::domain::Money,
        credit: crate::domain::Money,
        memo: Option<String>,
        posted_by: uuid::Uuid,
    ) -> AppResult<crate::domain::JournalEntry> {
        use super::repositories::entities::journal_entry::ActiveModel;
        use sea_orm::{ActiveModelTrait, Set};

        let active = ActiveModel {
            id: Set(uuid::Uuid::new_v4()),
            transaction_id: Set(transaction_id),
            account_id: Set(account_id),
            debit: Set(debit),
            credit: Set(credit),
            memo: Set(memo),
            posted_by: Set(posted_by),
            created_at: Set(chrono::Utc::now()),
        };

        let model = active.insert(self.txn).await.map_err(AppError::from)?;
        Ok(crate::domain::JournalEntry::from(model))
    }

    pub async fn set_account_balance(
        &self,
        id: uuid::Uuid,
        balance: crate::domain::Money,
    ) -> AppResult<crate::domain::Account> {
        use super::repositories::entities::account::{ActiveModel, Entity as AccountEntity};
        use sea_orm::{ActiveModelTrait, EntityTrait, Set};

        let model = AccountEntity::find_by_id(id)
            .one(self.txn)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = model.into();
        active.balance = Set(balance);

        let model = active.update(self.txn).await.map_err(AppError::from)?;
        Ok(crate::domain::Account::from(model))
    }
}

/// Transaction-aware payroll operations used by the period generator.
pub struct TxPayrollRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxPayrollRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Whether a teacher already has an entry for the period
    pub async fn exists(&self, teacher_id: uuid::Uuid, period: &str) -> AppResult<bool> {
        use super::repositories::entities::payroll_entry::{self, Entity as PayrollEntity};
        use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

        let result = PayrollEntity::find()
            .filter(payroll_entry::Column::TeacherId.eq(teacher_id))
            .filter(payroll_entry::Column::Period.eq(period))
            .one(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.is_some())
    }

    pub async fn insert(
        &self,
        teacher_id: uuid::Uuid,
        period: String,
        base_salary: crate::domain::Money,
        allowances: crate::domain::Money,
        deductions: crate::domain::Money,
    ) -> AppResult<crate::domain::PayrollEntry> {
        use super::repositories::entities::payroll_entry::ActiveModel;
        use sea_orm::{ActiveModelTrait, Set};

        let net_pay = crate::domain::PayrollEntry::compute_net(base_salary, allowances, deductions);
        let active = ActiveModel {
            id: Set(uuid::Uuid::new_v4()),
            teacher_id: Set(teacher_id),
            period: Set(period),
            base_salary: Set(base_salary),
            allowances: Set(allowances),
            deductions: Set(deductions),
            net_pay: Set(net_pay),
            status: Set(crate::domain::PayrollStatus::Pending.to_string()),
            paid_at: Set(None),
            created_at: Set(chrono::Utc::now()),
        };

        let model = active.insert(self.txn).await.map_err(AppError::from)?;
        Ok(crate::domain::PayrollEntry::from(model))
    }
}
