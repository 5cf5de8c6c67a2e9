//! Exam and result repository.

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::exam::{self, ActiveModel as ExamActiveModel, Entity as ExamEntity};
use super::entities::exam_result::{
    self, ActiveModel as ResultActiveModel, Entity as ResultEntity,
};
use crate::domain::{Exam, ExamResult};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Fields for creating an exam
#[derive(Debug, Clone, PartialEq)]
pub struct NewExam {
    pub name: String,
    pub class_name: String,
    pub subject: String,
    pub date: NaiveDate,
    pub max_marks: i32,
}

/// Partial update; None leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExamPatch {
    pub name: Option<String>,
    pub subject: Option<String>,
    pub date: Option<NaiveDate>,
    pub max_marks: Option<i32>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ExamRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Exam>>;

    async fn list(&self, class_name: Option<String>) -> AppResult<Vec<Exam>>;

    async fn create(&self, new: NewExam) -> AppResult<Exam>;

    async fn update(&self, id: Uuid, patch: ExamPatch) -> AppResult<Exam>;

    /// Hard delete; results for the exam are removed first
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Insert or overwrite a student's marks for an exam
    async fn upsert_result(
        &self,
        exam_id: Uuid,
        student_id: Uuid,
        marks: i32,
        grade: String,
    ) -> AppResult<ExamResult>;

    async fn results_for_exam(&self, exam_id: Uuid) -> AppResult<Vec<ExamResult>>;

    async fn results_for_student(&self, student_id: Uuid) -> AppResult<Vec<ExamResult>>;
}

/// Concrete implementation of ExamRepository
pub struct ExamStore {
    db: DatabaseConnection,
}

impl ExamStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ExamRepository for ExamStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Exam>> {
        let result = ExamEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Exam::from))
    }

    async fn list(&self, class_name: Option<String>) -> AppResult<Vec<Exam>> {
        let mut query = ExamEntity::find();
        if let Some(class_name) = class_name {
            query = query.filter(exam::Column::ClassName.eq(class_name));
        }

        let models = query
            .order_by_desc(exam::Column::Date)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Exam::from).collect())
    }

    async fn create(&self, new: NewExam) -> AppResult<Exam> {
        let active = ExamActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(new.name),
            class_name: Set(new.class_name),
            subject: Set(new.subject),
            date: Set(new.date),
            max_marks: Set(new.max_marks),
            created_at: Set(chrono::Utc::now()),
        };

        let model = active.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Exam::from(model))
    }

    async fn update(&self, id: Uuid, patch: ExamPatch) -> AppResult<Exam> {
        let model = ExamEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ExamActiveModel = model.into();

        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(subject) = patch.subject {
            active.subject = Set(subject);
        }
        if let Some(date) = patch.date {
            active.date = Set(date);
        }
        if let Some(max_marks) = patch.max_marks {
            active.max_marks = Set(max_marks);
        }

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Exam::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        ResultEntity::delete_many()
            .filter(exam_result::Column::ExamId.eq(id))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        let result = ExamEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn upsert_result(
        &self,
        exam_id: Uuid,
        student_id: Uuid,
        marks: i32,
        grade: String,
    ) -> AppResult<ExamResult> {
        let existing = ResultEntity::find()
            .filter(exam_result::Column::ExamId.eq(exam_id))
            .filter(exam_result::Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        let model = match existing {
            Some(model) => {
                let mut active: ResultActiveModel = model.into();
                active.marks = Set(marks);
                active.grade = Set(grade);
                active.update(&self.db).await.map_err(AppError::from)?
            }
            None => {
                let active = ResultActiveModel {
                    id: Set(Uuid::new_v4()),
                    exam_id: Set(exam_id),
                    student_id: Set(student_id),
                    marks: Set(marks),
                    grade: Set(grade),
                };
                active.insert(&self.db).await.map_err(AppError::from)?
            }
        };

        Ok(ExamResult::from(model))
    }

    async fn results_for_exam(&self, exam_id: Uuid) -> AppResult<Vec<ExamResult>> {
        let models = ResultEntity::find()
            .filter(exam_result::Column::ExamId.eq(exam_id))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(ExamResult::from).collect())
    }

    async fn results_for_student(&self, student_id: Uuid) -> AppResult<Vec<ExamResult>> {
        let models = ResultEntity::find()
            .filter(exam_result::Column::StudentId.eq(student_id))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(ExamResult::from).collect())
    }
}
