//! Attendance repository.
//!
//! Marks are upserted per (student, date): re-marking a day overwrites
//! the earlier status instead of inserting a second row.

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::attendance_record::{self, ActiveModel, Entity as AttendanceEntity};
use crate::domain::{AttendanceRecord, AttendanceStatus, AttendanceSummary};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// List filters; all optional, combined with AND
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttendanceFilter {
    pub student_id: Option<Uuid>,
    pub class_name: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    /// Insert or overwrite one student's mark for a date
    async fn mark(
        &self,
        student_id: Uuid,
        class_name: String,
        date: NaiveDate,
        status: AttendanceStatus,
        recorded_by: Uuid,
    ) -> AppResult<AttendanceRecord>;

    async fn list(&self, filter: AttendanceFilter) -> AppResult<Vec<AttendanceRecord>>;

    /// Status counts for one student over an optional date range
    async fn summary(
        &self,
        student_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> AppResult<AttendanceSummary>;
}

/// Concrete implementation of AttendanceRepository
pub struct AttendanceStore {
    db: DatabaseConnection,
}

impl AttendanceStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AttendanceRepository for AttendanceStore {
    async fn mark(
        &self,
        student_id: Uuid,
        class_name: String,
        date: NaiveDate,
        status: AttendanceStatus,
        recorded_by: Uuid,
    ) -> AppResult<AttendanceRecord> {
        let existing = AttendanceEntity::find()
            .filter(attendance_record::Column::StudentId.eq(student_id))
            .filter(attendance_record::Column::Date.eq(date))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        let model = match existing {
            Some(model) => {
                let mut active: ActiveModel = model.into();
                active.class_name = Set(class_name);
                active.status = Set(status.to_string());
                active.recorded_by = Set(recorded_by);
                active.update(&self.db).await.map_err(AppError::from)?
            }
            None => {
                let active = ActiveModel {
                    id: Set(Uuid::new_v4()),
                    student_id: Set(student_id),
                    class_name: Set(class_name),
                    date: Set(date),
                    status: Set(status.to_string()),
                    recorded_by: Set(recorded_by),
                };
                active.insert(&self.db).await.map_err(AppError::from)?
            }
        };

        Ok(AttendanceRecord::from(model))
    }

    async fn list(&self, filter: AttendanceFilter) -> AppResult<Vec<AttendanceRecord>> {
        let mut query = AttendanceEntity::find();

        if let Some(student_id) = filter.student_id {
            query = query.filter(attendance_record::Column::StudentId.eq(student_id));
        }
        if let Some(class_name) = filter.class_name {
            query = query.filter(attendance_record::Column::ClassName.eq(class_name));
        }
        if let Some(from) = filter.from {
            query = query.filter(attendance_record::Column::Date.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(attendance_record::Column::Date.lte(to));
        }

        let models = query
            .order_by_desc(attendance_record::Column::Date)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(AttendanceRecord::from).collect())
    }

    async fn summary(
        &self,
        student_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> AppResult<AttendanceSummary> {
        let records = self
            .list(AttendanceFilter {
                student_id: Some(student_id),
                class_name: None,
                from,
                to,
            })
            .await?;

        let mut summary = AttendanceSummary {
            student_id,
            ..Default::default()
        };
        for record in records {
            match record.status {
                AttendanceStatus::Present => summary.present += 1,
                AttendanceStatus::Absent => summary.absent += 1,
                AttendanceStatus::Late => summary.late += 1,
                AttendanceStatus::Excused => summary.excused += 1,
            }
        }

        Ok(summary)
    }
}
