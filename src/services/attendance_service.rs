//! Attendance recording and reporting.
//!
//! Re-marking a student for a day overwrites the earlier status; there
//! is never more than one record per (student, date).

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{AttendanceRecord, AttendanceStatus, AttendanceSummary};
use crate::errors::{AppError, AppResult};
use crate::infra::{AttendanceFilter, UnitOfWork};

/// Attendance service trait for dependency injection.
#[async_trait]
pub trait AttendanceService: Send + Sync {
    /// Mark one student for one date
    async fn mark(
        &self,
        student_id: Uuid,
        date: NaiveDate,
        status: AttendanceStatus,
        recorded_by: Uuid,
    ) -> AppResult<AttendanceRecord>;

    /// Mark a whole class in one call; returns the records in input order.
    ///
    /// Writes row by row and stops at the first failure, so earlier
    /// marks stay recorded. Each mark is an upsert per (student, date),
    /// making a corrected re-submission safe.
    async fn mark_bulk(
        &self,
        date: NaiveDate,
        marks: Vec<(Uuid, AttendanceStatus)>,
        recorded_by: Uuid,
    ) -> AppResult<Vec<AttendanceRecord>>;

    async fn list(&self, filter: AttendanceFilter) -> AppResult<Vec<AttendanceRecord>>;

    async fn summary(
        &self,
        student_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> AppResult<AttendanceSummary>;
}

/// Concrete implementation of AttendanceService using Unit of Work.
pub struct AttendanceManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> AttendanceManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn mark_one(
        &self,
        student_id: Uuid,
        date: NaiveDate,
        status: AttendanceStatus,
        recorded_by: Uuid,
    ) -> AppResult<AttendanceRecord> {
        let student = self
            .uow
            .students()
            .find_by_id(student_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if !student.is_active() {
            return Err(AppError::validation(
                "Attendance can only be recorded for active students",
            ));
        }

        self.uow
            .attendance()
            .mark(student_id, student.class_name, date, status, recorded_by)
            .await
    }
}

#[async_trait]
impl<U: UnitOfWork> AttendanceService for AttendanceManager<U> {
    async fn mark(
        &self,
        student_id: Uuid,
        date: NaiveDate,
        status: AttendanceStatus,
        recorded_by: Uuid,
    ) -> AppResult<AttendanceRecord> {
        self.mark_one(student_id, date, status, recorded_by).await
    }

    async fn mark_bulk(
        &self,
        date: NaiveDate,
        marks: Vec<(Uuid, AttendanceStatus)>,
        recorded_by: Uuid,
    ) -> AppResult<Vec<AttendanceRecord>> {
        if marks.is_empty() {
            return Err(AppError::validation("No attendance marks supplied"));
        }

        let mut records = Vec::with_capacity(marks.len());
        for (student_id, status) in marks {
            records.push(self.mark_one(student_id, date, status, recorded_by).await?);
        }
        Ok(records)
    }

    async fn list(&self, filter: AttendanceFilter) -> AppResult<Vec<AttendanceRecord>> {
        self.uow.attendance().list(filter).await
    }

    async fn summary(
        &self,
        student_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> AppResult<AttendanceSummary> {
        // 404 for unknown students rather than an empty summary
        self.uow
            .students()
            .find_by_id(student_id)
            .await?
            .ok_or(AppError::NotFound)?;

        self.uow.attendance().summary(student_id, from, to).await
    }
}
