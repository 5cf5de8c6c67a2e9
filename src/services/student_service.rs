//! Student management, including bulk CSV import and export.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::Student;
use crate::errors::{AppError, AppResult};
use crate::infra::{NewStudent, StudentFilter, StudentPatch, UnitOfWork};
use crate::types::{Paginated, PaginationParams};
use crate::utils::csv as csv_util;

/// Outcome of a bulk import: created rows plus per-row failures.
#[derive(Debug, Serialize, ToSchema)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
    /// (1-based data row, reason) for every rejected row
    pub errors: Vec<ImportError>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ImportError {
    pub row: usize,
    pub message: String,
}

/// Student service trait for dependency injection.
#[async_trait]
pub trait StudentService: Send + Sync {
    async fn get_student(&self, id: Uuid) -> AppResult<Student>;

    async fn list_students(
        &self,
        filter: StudentFilter,
        page: PaginationParams,
    ) -> AppResult<Paginated<Student>>;

    async fn create_student(&self, new: NewStudent) -> AppResult<Student>;

    async fn update_student(&self, id: Uuid, patch: StudentPatch) -> AppResult<Student>;

    async fn delete_student(&self, id: Uuid) -> AppResult<()>;

    async fn restore_student(&self, id: Uuid) -> AppResult<Student>;

    /// Bulk import from an uploaded CSV file
    async fn import_csv(&self, data: Vec<u8>) -> AppResult<ImportSummary>;

    /// Export all students as a CSV document
    async fn export_csv(&self) -> AppResult<String>;
}

/// Concrete implementation of StudentService using Unit of Work.
pub struct StudentManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> StudentManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> StudentService for StudentManager<U> {
    async fn get_student(&self, id: Uuid) -> AppResult<Student> {
        self.uow
            .students()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn list_students(
        &self,
        filter: StudentFilter,
        page: PaginationParams,
    ) -> AppResult<Paginated<Student>> {
        let (students, total) = self.uow.students().list(filter, page.clone()).await?;
        Ok(Paginated::new(students, page.page, page.limit(), total))
    }

    async fn create_student(&self, new: NewStudent) -> AppResult<Student> {
        if new.total_fees < 0 {
            return Err(AppError::validation("total_fees must not be negative"));
        }

        // Includes soft-deleted so admission numbers are never reused
        if self
            .uow
            .students()
            .find_by_admission_no(&new.admission_no)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Student"));
        }

        self.uow.students().create(new).await
    }

    async fn update_student(&self, id: Uuid, patch: StudentPatch) -> AppResult<Student> {
        self.uow.students().update(id, patch).await
    }

    async fn delete_student(&self, id: Uuid) -> AppResult<()> {
        self.uow.students().delete(id).await
    }

    async fn restore_student(&self, id: Uuid) -> AppResult<Student> {
        self.uow.students().restore(id).await
    }

    async fn import_csv(&self, data: Vec<u8>) -> AppResult<ImportSummary> {
        let (rows, parse_errors) = csv_util::parse_students(&data)?;

        let mut imported = 0;
        let mut errors: Vec<ImportError> = parse_errors
            .into_iter()
            .map(|(row, message)| ImportError { row, message })
            .collect();

        for (row_no, row) in rows {
            if row.admission_no.is_empty() || row.first_name.is_empty() {
                errors.push(ImportError {
                    row: row_no,
                    message: "admission_no and first_name are required".to_string(),
                });
                continue;
            }
            if row.total_fees < 0 {
                errors.push(ImportError {
                    row: row_no,
                    message: "total_fees must not be negative".to_string(),
                });
                continue;
            }

            match self.create_student(NewStudent::from(row)).await {
                Ok(_) => imported += 1,
                Err(AppError::Conflict(_)) => errors.push(ImportError {
                    row: row_no,
                    message: "admission_no already exists".to_string(),
                }),
                Err(e) => return Err(e),
            }
        }

        let skipped = errors.len();
        tracing::info!(imported, skipped, "student import finished");

        Ok(ImportSummary {
            imported,
            skipped,
            errors,
        })
    }

    async fn export_csv(&self) -> AppResult<String> {
        let students = self.uow.students().list_all().await?;
        csv_util::export_students(&students)
    }
}
