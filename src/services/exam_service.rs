//! Exams and results.
//!
//! Grades are derived from marks at write time using the standard
//! percentage bands, so a stored result is always self-consistent.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{grade_for, Exam, ExamResult};
use crate::errors::{AppError, AppResult};
use crate::infra::{ExamPatch, NewExam, UnitOfWork};

/// Exam service trait for dependency injection.
#[async_trait]
pub trait ExamService: Send + Sync {
    async fn get_exam(&self, id: Uuid) -> AppResult<Exam>;

    async fn list_exams(&self, class_name: Option<String>) -> AppResult<Vec<Exam>>;

    async fn create_exam(&self, new: NewExam) -> AppResult<Exam>;

    async fn update_exam(&self, id: Uuid, patch: ExamPatch) -> AppResult<Exam>;

    async fn delete_exam(&self, id: Uuid) -> AppResult<()>;

    /// Record (or overwrite) one student's marks for an exam
    async fn record_result(
        &self,
        exam_id: Uuid,
        student_id: Uuid,
        marks: i32,
    ) -> AppResult<ExamResult>;

    async fn results_for_exam(&self, exam_id: Uuid) -> AppResult<Vec<ExamResult>>;

    async fn results_for_student(&self, student_id: Uuid) -> AppResult<Vec<ExamResult>>;
}

/// Concrete implementation of ExamService using Unit of Work.
pub struct ExamManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ExamManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> ExamService for ExamManager<U> {
    async fn get_exam(&self, id: Uuid) -> AppResult<Exam> {
        self.uow
            .exams()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn list_exams(&self, class_name: Option<String>) -> AppResult<Vec<Exam>> {
        self.uow.exams().list(class_name).await
    }

    async fn create_exam(&self, new: NewExam) -> AppResult<Exam> {
        if new.max_marks <= 0 {
            return Err(AppError::validation("max_marks must be positive"));
        }

        self.uow.exams().create(new).await
    }

    async fn update_exam(&self, id: Uuid, patch: ExamPatch) -> AppResult<Exam> {
        if patch.max_marks.is_some_and(|m| m <= 0) {
            return Err(AppError::validation("max_marks must be positive"));
        }

        self.uow.exams().update(id, patch).await
    }

    async fn delete_exam(&self, id: Uuid) -> AppResult<()> {
        self.uow.exams().delete(id).await
    }

    async fn record_result(
        &self,
        exam_id: Uuid,
        student_id: Uuid,
        marks: i32,
    ) -> AppResult<ExamResult> {
        let exam = self.get_exam(exam_id).await?;

        let student = self
            .uow
            .students()
            .find_by_id(student_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if student.class_name != exam.class_name {
            return Err(AppError::validation(
                "Student is not enrolled in the exam's class",
            ));
        }
        if marks < 0 || marks > exam.max_marks {
            return Err(AppError::validation(format!(
                "marks must be between 0 and {}",
                exam.max_marks
            )));
        }

        let grade = grade_for(marks, exam.max_marks).to_string();
        self.uow
            .exams()
            .upsert_result(exam_id, student_id, marks, grade)
            .await
    }

    async fn results_for_exam(&self, exam_id: Uuid) -> AppResult<Vec<ExamResult>> {
        // 404 for unknown exams rather than an empty list
        self.get_exam(exam_id).await?;
        self.uow.exams().results_for_exam(exam_id).await
    }

    async fn results_for_student(&self, student_id: Uuid) -> AppResult<Vec<ExamResult>> {
        self.uow.exams().results_for_student(student_id).await
    }
}
