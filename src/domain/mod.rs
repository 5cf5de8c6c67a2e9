//! Core business entities and logic.

mod attendance;
mod audit;
mod exam;
mod fees;
mod finance;
mod password;
mod school_settings;
mod student;
mod teacher;
mod timetable;
mod user;

pub use attendance::{AttendanceRecord, AttendanceStatus, AttendanceSummary};
pub use audit::AuditLog;
pub use exam::{grade_for, Exam, ExamResult, ExamResultResponse};
pub use fees::{FeePayment, FeeStructure, FeeStructureStatus};
pub use finance::{
    is_valid_period, validate_transaction, Account, AccountKind, ExpenseRequest, ExpenseStatus,
    JournalEntry, LedgerTransaction, PayrollEntry, PayrollStatus, TransactionLine,
    MAX_LINE_AMOUNT,
};
pub use password::Password;
pub use school_settings::SchoolSettings;
pub use student::{Student, StudentResponse, StudentStatus};
pub use teacher::{Teacher, TeacherStatus};
pub use timetable::TimetableEntry;
pub use user::{Role, User, UserResponse};

/// Monetary amounts are integer minor units (cents) everywhere.
pub type Money = i64;
