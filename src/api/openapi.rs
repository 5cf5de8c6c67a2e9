//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    attendance_handler, audit_handler, auth_handler, exam_handler, fee_handler, finance_handler,
    settings_handler, student_handler, teacher_handler, timetable_handler, user_handler,
};
use crate::domain::{
    Account, AccountKind, AttendanceRecord, AttendanceStatus, AuditLog, Exam, ExamResultResponse,
    ExpenseRequest, ExpenseStatus, FeePayment, FeeStructure, FeeStructureStatus, JournalEntry,
    LedgerTransaction, PayrollEntry, PayrollStatus, Role, SchoolSettings, StudentResponse,
    StudentStatus, Teacher, TeacherStatus, TimetableEntry, TransactionLine, UserResponse,
};
use crate::services::{
    ImportError, ImportSummary, PayrollRunSummary, PublishOutcome, TokenResponse,
};

/// OpenAPI documentation for the Schoolhouse API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Schoolhouse API",
        version = "0.1.0",
        description = "School management: students, teachers, attendance, exams, fees, timetables and finance"
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::login,
        auth_handler::me,
        auth_handler::change_password,
        // User and role endpoints
        user_handler::list_users,
        user_handler::get_user,
        user_handler::create_user,
        user_handler::update_user,
        user_handler::delete_user,
        user_handler::restore_user,
        user_handler::list_roles,
        user_handler::get_role,
        user_handler::create_role,
        user_handler::update_role,
        user_handler::delete_role,
        // Student endpoints
        student_handler::list_students,
        student_handler::get_student,
        student_handler::create_student,
        student_handler::update_student,
        student_handler::delete_student,
        student_handler::restore_student,
        student_handler::import_students,
        student_handler::export_students,
        // Teacher endpoints
        teacher_handler::list_teachers,
        teacher_handler::get_teacher,
        teacher_handler::create_teacher,
        teacher_handler::update_teacher,
        teacher_handler::delete_teacher,
        teacher_handler::restore_teacher,
        // Attendance endpoints
        attendance_handler::list_attendance,
        attendance_handler::mark_attendance,
        attendance_handler::mark_attendance_bulk,
        attendance_handler::attendance_summary,
        // Exam endpoints
        exam_handler::list_exams,
        exam_handler::get_exam,
        exam_handler::create_exam,
        exam_handler::update_exam,
        exam_handler::delete_exam,
        exam_handler::record_result,
        exam_handler::record_results_bulk,
        exam_handler::exam_results,
        exam_handler::student_results,
        // Fee endpoints
        fee_handler::list_structures,
        fee_handler::get_structure,
        fee_handler::create_structure,
        fee_handler::update_structure,
        fee_handler::delete_structure,
        fee_handler::publish_structure,
        fee_handler::revert_structure,
        fee_handler::record_payment,
        fee_handler::student_payments,
        fee_handler::payment_receipt,
        // Timetable endpoints
        timetable_handler::list_entries,
        timetable_handler::get_entry,
        timetable_handler::create_entry,
        timetable_handler::update_entry,
        timetable_handler::delete_entry,
        // Settings endpoints
        settings_handler::get_settings,
        settings_handler::update_settings,
        // Finance endpoints
        finance_handler::list_accounts,
        finance_handler::get_account,
        finance_handler::account_ledger,
        finance_handler::create_account,
        finance_handler::post_transaction,
        finance_handler::list_transactions,
        finance_handler::create_expense,
        finance_handler::list_expenses,
        finance_handler::decide_expense,
        finance_handler::generate_payroll,
        finance_handler::list_payroll,
        finance_handler::mark_payroll_paid,
        // Audit endpoints
        audit_handler::list_audit_logs,
    ),
    components(
        schemas(
            // Domain types
            Role,
            UserResponse,
            StudentResponse,
            StudentStatus,
            Teacher,
            TeacherStatus,
            AttendanceRecord,
            AttendanceStatus,
            Exam,
            ExamResultResponse,
            FeeStructure,
            FeeStructureStatus,
            FeePayment,
            TimetableEntry,
            SchoolSettings,
            Account,
            AccountKind,
            TransactionLine,
            JournalEntry,
            LedgerTransaction,
            ExpenseRequest,
            ExpenseStatus,
            PayrollEntry,
            PayrollStatus,
            AuditLog,
            // Service types
            TokenResponse,
            PublishOutcome,
            PayrollRunSummary,
            ImportSummary,
            ImportError,
            // Request types
            auth_handler::LoginRequest,
            auth_handler::ChangePasswordRequest,
            user_handler::CreateUserRequest,
            user_handler::UpdateUserRequest,
            user_handler::CreateRoleRequest,
            user_handler::UpdateRoleRequest,
            student_handler::CreateStudentRequest,
            student_handler::UpdateStudentRequest,
            teacher_handler::CreateTeacherRequest,
            teacher_handler::UpdateTeacherRequest,
            attendance_handler::MarkAttendanceRequest,
            attendance_handler::BulkMarkRequest,
            attendance_handler::BulkMark,
            attendance_handler::SummaryResponse,
            exam_handler::CreateExamRequest,
            exam_handler::UpdateExamRequest,
            exam_handler::RecordResultRequest,
            exam_handler::BulkResultsRequest,
            fee_handler::CreateStructureRequest,
            fee_handler::UpdateStructureRequest,
            fee_handler::RecordPaymentRequest,
            timetable_handler::CreateEntryRequest,
            timetable_handler::UpdateEntryRequest,
            settings_handler::UpdateSettingsRequest,
            finance_handler::CreateAccountRequest,
            finance_handler::PostTransactionRequest,
            finance_handler::CreateExpenseRequest,
            finance_handler::DecideExpenseRequest,
            finance_handler::GeneratePayrollRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login and session management"),
        (name = "Users", description = "User accounts and roles"),
        (name = "Students", description = "Student records and CSV transfer"),
        (name = "Teachers", description = "Teaching staff"),
        (name = "Attendance", description = "Daily attendance"),
        (name = "Exams", description = "Exams and results"),
        (name = "Fees", description = "Fee structures and payments"),
        (name = "Timetable", description = "Class timetables"),
        (name = "Settings", description = "School-wide settings"),
        (name = "Finance", description = "Ledger, expenses and payroll"),
        (name = "Audit", description = "Audit trail")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}
