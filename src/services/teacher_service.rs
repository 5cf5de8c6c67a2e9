//! Teacher management.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::Teacher;
use crate::errors::{AppError, AppResult};
use crate::infra::{NewTeacher, TeacherPatch, UnitOfWork};

/// Teacher service trait for dependency injection.
#[async_trait]
pub trait TeacherService: Send + Sync {
    async fn get_teacher(&self, id: Uuid) -> AppResult<Teacher>;

    async fn list_teachers(&self) -> AppResult<Vec<Teacher>>;

    async fn create_teacher(&self, new: NewTeacher) -> AppResult<Teacher>;

    async fn update_teacher(&self, id: Uuid, patch: TeacherPatch) -> AppResult<Teacher>;

    async fn delete_teacher(&self, id: Uuid) -> AppResult<()>;

    async fn restore_teacher(&self, id: Uuid) -> AppResult<Teacher>;
}

/// Concrete implementation of TeacherService using Unit of Work.
pub struct TeacherManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> TeacherManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> TeacherService for TeacherManager<U> {
    async fn get_teacher(&self, id: Uuid) -> AppResult<Teacher> {
        self.uow
            .teachers()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn list_teachers(&self) -> AppResult<Vec<Teacher>> {
        self.uow.teachers().list().await
    }

    async fn create_teacher(&self, new: NewTeacher) -> AppResult<Teacher> {
        if new.salary < 0 {
            return Err(AppError::validation("salary must not be negative"));
        }

        // Includes soft-deleted so staff numbers are never reused
        if self
            .uow
            .teachers()
            .find_by_staff_no(&new.staff_no)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Teacher"));
        }

        self.uow.teachers().create(new).await
    }

    async fn update_teacher(&self, id: Uuid, patch: TeacherPatch) -> AppResult<Teacher> {
        if patch.salary.is_some_and(|s| s < 0) {
            return Err(AppError::validation("salary must not be negative"));
        }

        self.uow.teachers().update(id, patch).await
    }

    async fn delete_teacher(&self, id: Uuid) -> AppResult<()> {
        self.uow.teachers().delete(id).await
    }

    async fn restore_teacher(&self, id: Uuid) -> AppResult<Teacher> {
        self.uow.teachers().restore(id).await
    }
}
