//! HTTP request handlers.

pub mod attendance_handler;
pub mod audit_handler;
pub mod auth_handler;
pub mod exam_handler;
pub mod fee_handler;
pub mod finance_handler;
pub mod settings_handler;
pub mod student_handler;
pub mod teacher_handler;
pub mod timetable_handler;
pub mod user_handler;

pub use attendance_handler::attendance_routes;
pub use audit_handler::audit_routes;
pub use auth_handler::{auth_routes, session_routes};
pub use exam_handler::{exam_routes, result_routes};
pub use fee_handler::fee_routes;
pub use finance_handler::finance_routes;
pub use settings_handler::settings_routes;
pub use student_handler::student_routes;
pub use teacher_handler::teacher_routes;
pub use timetable_handler::timetable_routes;
pub use user_handler::{role_routes, user_routes};
