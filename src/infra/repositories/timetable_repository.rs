//! Timetable repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::timetable_entry::{self, ActiveModel, Entity as TimetableEntity};
use crate::domain::TimetableEntry;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Fields for creating a timetable entry
#[derive(Debug, Clone, PartialEq)]
pub struct NewTimetableEntry {
    pub class_name: String,
    pub day_of_week: i16,
    pub period: i16,
    pub subject: String,
    pub teacher_id: Uuid,
}

/// Partial update; None leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimetableEntryPatch {
    pub subject: Option<String>,
    pub teacher_id: Option<Uuid>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TimetableRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<TimetableEntry>>;

    async fn list(
        &self,
        class_name: Option<String>,
        teacher_id: Option<Uuid>,
    ) -> AppResult<Vec<TimetableEntry>>;

    /// The entry occupying a class slot, if any
    async fn find_class_slot(
        &self,
        class_name: &str,
        day_of_week: i16,
        period: i16,
    ) -> AppResult<Option<TimetableEntry>>;

    /// The entry a teacher already holds in a slot, if any
    async fn find_teacher_slot(
        &self,
        teacher_id: Uuid,
        day_of_week: i16,
        period: i16,
    ) -> AppResult<Option<TimetableEntry>>;

    async fn create(&self, new: NewTimetableEntry) -> AppResult<TimetableEntry>;

    async fn update(&self, id: Uuid, patch: TimetableEntryPatch) -> AppResult<TimetableEntry>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of TimetableRepository
pub struct TimetableStore {
    db: DatabaseConnection,
}

impl TimetableStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TimetableRepository for TimetableStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<TimetableEntry>> {
        let result = TimetableEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(TimetableEntry::from))
    }

    async fn list(
        &self,
        class_name: Option<String>,
        teacher_id: Option<Uuid>,
    ) -> AppResult<Vec<TimetableEntry>> {
        let mut query = TimetableEntity::find();
        if let Some(class_name) = class_name {
            query = query.filter(timetable_entry::Column::ClassName.eq(class_name));
        }
        if let Some(teacher_id) = teacher_id {
            query = query.filter(timetable_entry::Column::TeacherId.eq(teacher_id));
        }

        let models = query
            .order_by_asc(timetable_entry::Column::DayOfWeek)
            .order_by_asc(timetable_entry::Column::Period)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(TimetableEntry::from).collect())
    }

    async fn find_class_slot(
        &self,
        class_name: &str,
        day_of_week: i16,
        period: i16,
    ) -> AppResult<Option<TimetableEntry>> {
        let result = TimetableEntity::find()
            .filter(timetable_entry::Column::ClassName.eq(class_name))
            .filter(timetable_entry::Column::DayOfWeek.eq(day_of_week))
            .filter(timetable_entry::Column::Period.eq(period))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(TimetableEntry::from))
    }

    async fn find_teacher_slot(
        &self,
        teacher_id: Uuid,
        day_of_week: i16,
        period: i16,
    ) -> AppResult<Option<TimetableEntry>> {
        let result = TimetableEntity::find()
            .filter(timetable_entry::Column::TeacherId.eq(teacher_id))
            .filter(timetable_entry::Column::DayOfWeek.eq(day_of_week))
            .filter(timetable_entry::Column::Period.eq(period))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(TimetableEntry::from))
    }

    async fn create(&self, new: NewTimetableEntry) -> AppResult<TimetableEntry> {
        let active = ActiveModel {
            id: Set(Uuid::new_v4()),
            class_name: Set(new.class_name),
            day_of_week: Set(new.day_of_week),
            period: Set(new.period),
            subject: Set(new.subject),
            teacher_id: Set(new.teacher_id),
        };

        let model = active.insert(&self.db).await.map_err(AppError::from)?;
        Ok(TimetableEntry::from(model))
    }

    async fn update(&self, id: Uuid, patch: TimetableEntryPatch) -> AppResult<TimetableEntry> {
        let model = TimetableEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = model.into();

        if let Some(subject) = patch.subject {
            active.subject = Set(subject);
        }
        if let Some(teacher_id) = patch.teacher_id {
            active.teacher_id = Set(teacher_id);
        }

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(TimetableEntry::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = TimetableEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
