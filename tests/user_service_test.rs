//! User and role service unit tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use mockall::predicate::eq;
use uuid::Uuid;

use schoolhouse::config::{PERM_MANAGE_STUDENTS, PERM_VIEW_STUDENTS, ROLE_ADMIN};
use schoolhouse::domain::{Role, User};
use schoolhouse::errors::{AppError, AppResult};
use schoolhouse::infra::{
    AttendanceRepository, AuditRepository, ExamRepository, FeeRepository, FinanceRepository,
    MockAttendanceRepository, MockAuditRepository, MockExamRepository, MockFeeRepository,
    MockFinanceRepository, MockRoleRepository, MockSettingsRepository, MockStudentRepository,
    MockTeacherRepository, MockTimetableRepository, MockUserRepository, RoleRepository,
    SettingsRepository, StudentRepository, TeacherRepository, TimetableRepository,
    TransactionContext, UnitOfWork, UserRepository,
};
use schoolhouse::services::{UserManager, UserService};

fn test_role(id: Uuid, name: &str) -> Role {
    Role {
        id,
        name: name.to_string(),
        permissions: vec![PERM_VIEW_STUDENTS.to_string()],
    }
}

fn test_user(id: Uuid, role_id: Uuid) -> User {
    User {
        id,
        email: "staff@school.test".to_string(),
        password_hash: "hashed".to_string(),
        name: "Test Staff".to_string(),
        role_id,
        role_name: "registrar".to_string(),
        permissions: vec![PERM_VIEW_STUDENTS.to_string()],
        created_at: Utc::now(),
        updated_at: Utc::now(),
        deleted_at: None,
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

#[tokio::test]
async fn test_get_user_success() {
    let user_id = Uuid::new_v4();
    let role_id = Uuid::new_v4();

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .with(eq(user_id))
        .returning(move |id| Ok(Some(test_user(id, role_id))));

    let uow = TestUnitOfWork {
        users: Arc::new(users),
        ..Default::default()
    };
    let service = UserManager::new(Arc::new(uow));
    let result = service.get_user(user_id).await;

    assert!(result.is_ok());
    assert_eq!(result.unwrap().id, user_id);
}

#[tokio::test]
async fn test_get_user_not_found() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().returning(|_| Ok(None));

    let uow = TestUnitOfWork {
        users: Arc::new(users),
        ..Default::default()
    };
    let service = UserManager::new(Arc::new(uow));
    let result = service.get_user(Uuid::new_v4()).await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}

#[tokio::test]
async fn test_create_user_rejects_duplicate_email() {
    let role_id = Uuid::new_v4();

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .returning(move |_| Ok(Some(test_user(Uuid::new_v4(), role_id))));

    let uow = TestUnitOfWork {
        users: Arc::new(users),
        ..Default::default()
    };
    let service = UserManager::new(Arc::new(uow));
    let result = service
        .create_user(
            "staff@school.test".to_string(),
            "secret-password".to_string(),
            "Test Staff".to_string(),
            role_id,
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
}

#[tokio::test]
async fn test_create_user_rejects_unknown_role() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().returning(|_| Ok(None));

    let mut roles = MockRoleRepository::new();
    roles.expect_find_by_id().returning(|_| Ok(None));

    let uow = TestUnitOfWork {
        users: Arc::new(users),
        roles: Arc::new(roles),
        ..Default::default()
    };
    let service = UserManager::new(Arc::new(uow));
    let result = service
        .create_user(
            "staff@school.test".to_string(),
            "secret-password".to_string(),
            "Test Staff".to_string(),
            Uuid::new_v4(),
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn test_create_user_hashes_password() {
    let role_id = Uuid::new_v4();

    let mut users = MockUserRepository::new();
    users.expect_find_by_email().returning(|_| Ok(None));
    users
        .expect_create()
        .withf(|_, hash, _, _| hash.starts_with("$argon2") && hash.as_str() != "secret-password")
        .returning(move |email, hash, name, role_id| {
            let mut user = test_user(Uuid::new_v4(), role_id);
            user.email = email;
            user.password_hash = hash;
            user.name = name;
            Ok(user)
        });

    let mut roles = MockRoleRepository::new();
    roles
        .expect_find_by_id()
        .returning(|id| Ok(Some(test_role(id, "registrar"))));

    let uow = TestUnitOfWork {
        users: Arc::new(users),
        roles: Arc::new(roles),
        ..Default::default()
    };
    let service = UserManager::new(Arc::new(uow));
    let result = service
        .create_user(
            "staff@school.test".to_string(),
            "secret-password".to_string(),
            "Test Staff".to_string(),
            role_id,
        )
        .await;

    assert!(result.is_ok());
    assert_ne!(result.unwrap().password_hash, "secret-password");
}

#[tokio::test]
async fn test_restore_user_success() {
    let user_id = Uuid::new_v4();
    let role_id = Uuid::new_v4();

    let mut users = MockUserRepository::new();
    users
        .expect_restore()
        .with(eq(user_id))
        .returning(move |id| Ok(test_user(id, role_id)));

    let uow = TestUnitOfWork {
        users: Arc::new(users),
        ..Default::default()
    };
    let service = UserManager::new(Arc::new(uow));
    let result = service.restore_user(user_id).await;

    assert!(result.is_ok());
    assert_eq!(result.unwrap().id, user_id);
}

#[tokio::test]
async fn test_restore_user_not_deleted() {
    let mut users = MockUserRepository::new();
    users
        .expect_restore()
        .returning(|_| Err(AppError::validation("User is not deleted or does not exist")));

    let uow = TestUnitOfWork {
        users: Arc::new(users),
        ..Default::default()
    };
    let service = UserManager::new(Arc::new(uow));
    let result = service.restore_user(Uuid::new_v4()).await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn test_create_role_rejects_unknown_permission() {
    let uow = TestUnitOfWork::default();
    let service = UserManager::new(Arc::new(uow));
    let result = service
        .create_role(
            "registrar".to_string(),
            vec!["definitely_not_a_permission".to_string()],
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn test_create_role_rejects_duplicate_name() {
    let mut roles = MockRoleRepository::new();
    roles
        .expect_find_by_name()
        .returning(|name| Ok(Some(test_role(Uuid::new_v4(), name))));

    let uow = TestUnitOfWork {
        roles: Arc::new(roles),
        ..Default::default()
    };
    let service = UserManager::new(Arc::new(uow));
    let result = service
        .create_role(
            "registrar".to_string(),
            vec![PERM_MANAGE_STUDENTS.to_string()],
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
}

#[tokio::test]
async fn test_update_role_cannot_rename_admin() {
    let role_id = Uuid::new_v4();

    let mut roles = MockRoleRepository::new();
    roles
        .expect_find_by_id()
        .with(eq(role_id))
        .returning(|id| Ok(Some(test_role(id, ROLE_ADMIN))));

    let uow = TestUnitOfWork {
        roles: Arc::new(roles),
        ..Default::default()
    };
    let service = UserManager::new(Arc::new(uow));
    let result = service
        .update_role(role_id, Some("superuser".to_string()), None)
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn test_delete_role_admin_blocked() {
    let role_id = Uuid::new_v4();

    let mut roles = MockRoleRepository::new();
    roles
        .expect_find_by_id()
        .returning(|id| Ok(Some(test_role(id, ROLE_ADMIN))));
    roles.expect_delete().never();

    let uow = TestUnitOfWork {
        roles: Arc::new(roles),
        ..Default::default()
    };
    let service = UserManager::new(Arc::new(uow));
    let result = service.delete_role(role_id).await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn test_delete_role_still_assigned() {
    let role_id = Uuid::new_v4();

    let mut roles = MockRoleRepository::new();
    roles
        .expect_find_by_id()
        .returning(|id| Ok(Some(test_role(id, "registrar"))));
    roles.expect_delete().never();

    let mut users = MockUserRepository::new();
    users.expect_count_with_role().returning(|_| Ok(3));

    let uow = TestUnitOfWork {
        users: Arc::new(users),
        roles: Arc::new(roles),
        ..Default::default()
    };
    let service = UserManager::new(Arc::new(uow));
    let result = service.delete_role(role_id).await;

    assert!(matches!(result.unwrap_err(), AppError::BadRequest(_)));
}

#[tokio::test]
async fn test_delete_role_success() {
    let role_id = Uuid::new_v4();

    let mut roles = MockRoleRepository::new();
    roles
        .expect_find_by_id()
        .returning(|id| Ok(Some(test_role(id, "registrar"))));
    roles.expect_delete().with(eq(role_id)).returning(|_| Ok(()));

    let mut users = MockUserRepository::new();
    users.expect_count_with_role().returning(|_| Ok(0));

    let uow = TestUnitOfWork {
        users: Arc::new(users),
        roles: Arc::new(roles),
        ..Default::default()
    };
    let service = UserManager::new(Arc::new(uow));
    let result = service.delete_role(role_id).await;

    assert!(result.is_ok());
}
