//! Timetable management with double-booking checks.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::MAX_PERIOD;
use crate::domain::TimetableEntry;
use crate::errors::{AppError, AppResult};
use crate::infra::{NewTimetableEntry, TimetableEntryPatch, UnitOfWork};

/// Timetable service trait for dependency injection.
#[async_trait]
pub trait TimetableService: Send + Sync {
    async fn get_entry(&self, id: Uuid) -> AppResult<TimetableEntry>;

    async fn list_entries(
        &self,
        class_name: Option<String>,
        teacher_id: Option<Uuid>,
    ) -> AppResult<Vec<TimetableEntry>>;

    async fn create_entry(&self, new: NewTimetableEntry) -> AppResult<TimetableEntry>;

    async fn update_entry(&self, id: Uuid, patch: TimetableEntryPatch)
        -> AppResult<TimetableEntry>;

    async fn delete_entry(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of TimetableService using Unit of Work.
pub struct TimetableManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> TimetableManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    fn check_slot(day_of_week: i16, period: i16) -> AppResult<()> {
        if !(0..=6).contains(&day_of_week) {
            return Err(AppError::validation("day_of_week must be 0 (Sun) to 6 (Sat)"));
        }
        if !(1..=MAX_PERIOD).contains(&period) {
            return Err(AppError::validation(format!(
                "period must be between 1 and {}",
                MAX_PERIOD
            )));
        }
        Ok(())
    }

    /// Reject a teacher who is already booked in the slot, ignoring the
    /// entry being edited.
    async fn check_teacher_free(
        &self,
        teacher_id: Uuid,
        day_of_week: i16,
        period: i16,
        ignore_entry: Option<Uuid>,
    ) -> AppResult<()> {
        if let Some(existing) = self
            .uow
            .timetable()
            .find_teacher_slot(teacher_id, day_of_week, period)
            .await?
        {
            if Some(existing.id) != ignore_entry {
                return Err(AppError::conflict("Teacher booking for this slot"));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<U: UnitOfWork> TimetableService for TimetableManager<U> {
    async fn get_entry(&self, id: Uuid) -> AppResult<TimetableEntry> {
        self.uow
            .timetable()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn list_entries(
        &self,
        class_name: Option<String>,
        teacher_id: Option<Uuid>,
    ) -> AppResult<Vec<TimetableEntry>> {
        self.uow.timetable().list(class_name, teacher_id).await
    }

    async fn create_entry(&self, new: NewTimetableEntry) -> AppResult<TimetableEntry> {
        Self::check_slot(new.day_of_week, new.period)?;

        self.uow
            .teachers()
            .find_by_id(new.teacher_id)
            .await?
            .ok_or_else(|| AppError::validation("Teacher does not exist"))?;

        if self
            .uow
            .timetable()
            .find_class_slot(&new.class_name, new.day_of_week, new.period)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Timetable entry for this slot"));
        }

        self.check_teacher_free(new.teacher_id, new.day_of_week, new.period, None)
            .await?;

        self.uow.timetable().create(new).await
    }

    async fn update_entry(
        &self,
        id: Uuid,
        patch: TimetableEntryPatch,
    ) -> AppResult<TimetableEntry> {
        let entry = self.get_entry(id).await?;

        if let Some(teacher_id) = patch.teacher_id {
            self.uow
                .teachers()
                .find_by_id(teacher_id)
                .await?
                .ok_or_else(|| AppError::validation("Teacher does not exist"))?;

            self.check_teacher_free(teacher_id, entry.day_of_week, entry.period, Some(id))
                .await?;
        }

        self.uow.timetable().update(id, patch).await
    }

    async fn delete_entry(&self, id: Uuid) -> AppResult<()> {
        self.uow.timetable().delete(id).await
    }
}
