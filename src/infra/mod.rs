//! Infrastructure layer - External systems integration
//!
//! Database connections, repositories and the Unit of Work for
//! transaction management.

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{
    AttendanceFilter, AttendanceRepository, AttendanceStore, AuditRepository, AuditStore,
    ExamPatch, ExamRepository, ExamStore, FeeRepository, FeeStore, FeeStructurePatch,
    FinanceRepository, FinanceStore, NewAccount, NewExam, NewExpense, NewFeeStructure, NewStudent,
    NewTeacher, NewTimetableEntry, RoleRepository, RoleStore, SettingsPatch, SettingsRepository,
    SettingsStore, StudentFilter, StudentPatch, StudentRepository, StudentStore, TeacherPatch,
    TeacherRepository, TeacherStore, TimetableEntryPatch, TimetableRepository, TimetableStore,
    UserRepository, UserStore,
};
pub use unit_of_work::{
    Persistence, TransactionContext, TxFeeRepository, TxLedgerRepository, TxPayrollRepository,
    TxStudentRepository, UnitOfWork,
};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockAttendanceRepository, MockAuditRepository, MockExamRepository, MockFeeRepository,
    MockFinanceRepository, MockRoleRepository, MockSettingsRepository, MockStudentRepository,
    MockTeacherRepository, MockTimetableRepository, MockUserRepository,
};
