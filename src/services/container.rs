//! Service container - centralized service access.
//!
//! Handlers depend on the container trait, not on the concrete
//! managers.

use std::sync::Arc;

use super::{
    AttendanceService, AuditService, AuthService, ExamService, FeeService, FinanceService,
    SettingsService, StudentService, TeacherService, TimetableService, UserService,
};
use crate::config::Config;
use crate::infra::Persistence;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;
    fn users(&self) -> Arc<dyn UserService>;
    fn students(&self) -> Arc<dyn StudentService>;
    fn teachers(&self) -> Arc<dyn TeacherService>;
    fn attendance(&self) -> Arc<dyn AttendanceService>;
    fn exams(&self) -> Arc<dyn ExamService>;
    fn fees(&self) -> Arc<dyn FeeService>;
    fn timetable(&self) -> Arc<dyn TimetableService>;
    fn settings(&self) -> Arc<dyn SettingsService>;
    fn finance(&self) -> Arc<dyn FinanceService>;
    fn audit(&self) -> Arc<dyn AuditService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    student_service: Arc<dyn StudentService>,
    teacher_service: Arc<dyn TeacherService>,
    attendance_service: Arc<dyn AttendanceService>,
    exam_service: Arc<dyn ExamService>,
    fee_service: Arc<dyn FeeService>,
    timetable_service: Arc<dyn TimetableService>,
    settings_service: Arc<dyn SettingsService>,
    finance_service: Arc<dyn FinanceService>,
    audit_service: Arc<dyn AuditService>,
}

impl Services {
    /// Create service container from a database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        use super::{
            AttendanceManager, AuditRecorder, Authenticator, ExamManager, FeeManager,
            FinanceManager, SettingsManager, StudentManager, TeacherManager, TimetableManager,
            UserManager,
        };

        let uow = Arc::new(Persistence::new(db));

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            user_service: Arc::new(UserManager::new(uow.clone())),
            student_service: Arc::new(StudentManager::new(uow.clone())),
            teacher_service: Arc::new(TeacherManager::new(uow.clone())),
            attendance_service: Arc::new(AttendanceManager::new(uow.clone())),
            exam_service: Arc::new(ExamManager::new(uow.clone())),
            fee_service: Arc::new(FeeManager::new(uow.clone())),
            timetable_service: Arc::new(TimetableManager::new(uow.clone())),
            settings_service: Arc::new(SettingsManager::new(uow.clone())),
            finance_service: Arc::new(FinanceManager::new(uow.clone())),
            audit_service: Arc::new(AuditRecorder::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn students(&self) -> Arc<dyn StudentService> {
        self.student_service.clone()
    }

    fn teachers(&self) -> Arc<dyn TeacherService> {
        self.teacher_service.clone()
    }

    fn attendance(&self) -> Arc<dyn AttendanceService> {
        self.attendance_service.clone()
    }

    fn exams(&self) -> Arc<dyn ExamService> {
        self.exam_service.clone()
    }

    fn fees(&self) -> Arc<dyn FeeService> {
        self.fee_service.clone()
    }

    fn timetable(&self) -> Arc<dyn TimetableService> {
        self.timetable_service.clone()
    }

    fn settings(&self) -> Arc<dyn SettingsService> {
        self.settings_service.clone()
    }

    fn finance(&self) -> Arc<dyn FinanceService> {
        self.finance_service.clone()
    }

    fn audit(&self) -> Arc<dyn AuditService> {
        self.audit_service.clone()
    }
}
