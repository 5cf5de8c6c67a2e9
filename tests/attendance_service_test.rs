//! Attendance service unit tests, including bulk marking behaviour.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use schoolhouse::domain::{AttendanceRecord, AttendanceStatus, Student, StudentStatus};
use schoolhouse::errors::{AppError, AppResult};
use schoolhouse::infra::{
    AttendanceRepository, AuditRepository, ExamRepository, FeeRepository, FinanceRepository,
    MockAttendanceRepository, MockAuditRepository, MockExamRepository, MockFeeRepository,
    MockFinanceRepository, MockRoleRepository, MockSettingsRepository, MockStudentRepository,
    MockTeacherRepository, MockTimetableRepository, MockUserRepository, RoleRepository,
    SettingsRepository, StudentRepository, TeacherRepository, TimetableRepository,
    TransactionContext, UnitOfWork, UserRepository,
};
use schoolhouse::services::{AttendanceManager, AttendanceService};

fn test_student(id: Uuid, status: StudentStatus) -> Student {
    Student {
        id,
        admission_no: "ADM-001".to_string(),
        first_name: "Amina".to_string(),
        last_name: "Okoro".to_string(),
        class_name: "Grade 5".to_string(),
        section: Some("A".to_string()),
        guardian_name: None,
        guardian_phone: None,
        total_fees: 120_000,
        paid_fees: 30_000,
        fee_balance: 90_000,
        status,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        deleted_at: None,
    }
}

fn test_record(student_id: Uuid, date: NaiveDate, status: AttendanceStatus) -> AttendanceRecord {
    AttendanceRecord {
        id: Uuid::new_v4(),
        student_id,
        class_name: "Grade 5".to_string(),
        date,
        status,
        recorded_by: Uuid::new_v4(),
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

fn service_with(
    students: MockStudentRepository,
    attendance: MockAttendanceRepository,
) -> AttendanceManager<TestUnitOfWork> {
    let uow = TestUnitOfWork {
        students: Arc::new(students),
        attendance: Arc::new(attendance),
        ..Default::default()
    };
    AttendanceManager::new(Arc::new(uow))
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 25).unwrap()
}

#[tokio::test]
async fn test_mark_rejects_inactive_student() {
    let mut students = MockStudentRepository::new();
    students
        .expect_find_by_id()
        .returning(|id| Ok(Some(test_student(id, StudentStatus::Inactive))));
    let mut attendance = MockAttendanceRepository::new();
    attendance.expect_mark().never();

    let result = service_with(students, attendance)
        .mark(Uuid::new_v4(), date(), AttendanceStatus::Present, Uuid::new_v4())
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn test_mark_bulk_rejects_empty_list() {
    let students = MockStudentRepository::new();
    let attendance = MockAttendanceRepository::new();

    let result = service_with(students, attendance)
        .mark_bulk(date(), vec![], Uuid::new_v4())
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn test_mark_bulk_stops_at_first_bad_entry_keeping_earlier_marks() {
    let active_id = Uuid::new_v4();
    let inactive_id = Uuid::new_v4();
    let unseen_id = Uuid::new_v4();

    let mut students = MockStudentRepository::new();
    students.expect_find_by_id().returning(move |id| {
        if id == inactive_id {
            Ok(Some(test_student(id, StudentStatus::Inactive)))
        } else {
            Ok(Some(test_student(id, StudentStatus::Active)))
        }
    });

    // Only the first mark reaches the repository; the inactive student
    // aborts the run before the third is attempted.
    let mut attendance = MockAttendanceRepository::new();
    attendance
        .expect_mark()
        .times(1)
        .withf(move |student_id, _, _, _, _| *student_id == active_id)
        .returning(|student_id, _, date, status, _| Ok(test_record(student_id, date, status)));

    let marks = vec![
        (active_id, AttendanceStatus::Present),
        (inactive_id, AttendanceStatus::Absent),
        (unseen_id, AttendanceStatus::Present),
    ];
    let result = service_with(students, attendance)
        .mark_bulk(date(), marks, Uuid::new_v4())
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn test_mark_bulk_returns_records_in_input_order() {
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();

    let mut students = MockStudentRepository::new();
    students
        .expect_find_by_id()
        .returning(|id| Ok(Some(test_student(id, StudentStatus::Active))));
    let mut attendance = MockAttendanceRepository::new();
    attendance
        .expect_mark()
        .times(2)
        .returning(|student_id, _, date, status, _| Ok(test_record(student_id, date, status)));

    let marks = vec![
        (first, AttendanceStatus::Present),
        (second, AttendanceStatus::Late),
    ];
    let records = service_with(students, attendance)
        .mark_bulk(date(), marks, Uuid::new_v4())
        .await
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].student_id, first);
    assert_eq!(records[1].student_id, second);
    assert_eq!(records[1].status, AttendanceStatus::Late);
}
