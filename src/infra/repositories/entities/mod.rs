//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.
//! Each module carries the `From<Model>` conversion into its domain type.

pub mod account;
pub mod attendance_record;
pub mod audit_log;
pub mod exam;
pub mod exam_result;
pub mod expense_request;
pub mod fee_payment;
pub mod fee_structure;
pub mod journal_entry;
pub mod payroll_entry;
pub mod role;
pub mod school_settings;
pub mod student;
pub mod teacher;
pub mod timetable_entry;
pub mod user;
