//! Application services layer - use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion, and on the Unit of Work for repository access
//! and transactions.

mod attendance_service;
mod audit_service;
mod auth_service;
pub mod container;
mod exam_service;
mod fee_service;
mod finance_service;
mod settings_service;
mod student_service;
mod teacher_service;
mod timetable_service;
mod user_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use attendance_service::{AttendanceManager, AttendanceService};
pub use audit_service::{AuditRecorder, AuditService};
pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use exam_service::{ExamManager, ExamService};
pub use fee_service::{FeeManager, FeeService, PublishOutcome, ReceiptData};
pub use finance_service::{FinanceManager, FinanceService, PayrollRunSummary};
pub use settings_service::{SettingsManager, SettingsService};
pub use student_service::{ImportError, ImportSummary, StudentManager, StudentService};
pub use teacher_service::{TeacherManager, TeacherService};
pub use timetable_service::{TimetableManager, TimetableService};
pub use user_service::{UserManager, UserService};
