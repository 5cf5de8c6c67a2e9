//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

pub(crate) mod entities;

mod attendance_repository;
mod audit_repository;
mod exam_repository;
mod fee_repository;
mod finance_repository;
mod role_repository;
mod settings_repository;
mod student_repository;
mod teacher_repository;
mod timetable_repository;
mod user_repository;

pub use attendance_repository::{AttendanceFilter, AttendanceRepository, AttendanceStore};
pub use audit_repository::{AuditRepository, AuditStore};
pub use exam_repository::{ExamPatch, ExamRepository, ExamStore, NewExam};
pub use fee_repository::{FeeRepository, FeeStore, FeeStructurePatch, NewFeeStructure};
pub use finance_repository::{FinanceRepository, FinanceStore, NewAccount, NewExpense};
pub use role_repository::{RoleRepository, RoleStore};
pub use settings_repository::{SettingsPatch, SettingsRepository, SettingsStore};
pub use student_repository::{
    NewStudent, StudentFilter, StudentPatch, StudentRepository, StudentStore,
};
pub use teacher_repository::{NewTeacher, TeacherPatch, TeacherRepository, TeacherStore};
pub use timetable_repository::{
    NewTimetableEntry, TimetableEntryPatch, TimetableRepository, TimetableStore,
};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use attendance_repository::MockAttendanceRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use audit_repository::MockAuditRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use exam_repository::MockExamRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use fee_repository::MockFeeRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use finance_repository::MockFinanceRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use role_repository::MockRoleRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use settings_repository::MockSettingsRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use student_repository::MockStudentRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use teacher_repository::MockTeacherRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use timetable_repository::MockTimetableRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
