//! Student repository with soft delete support.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::student::{self, ActiveModel, Entity as StudentEntity};
use crate::domain::{Money, Student, StudentStatus};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Fields for creating a student
#[derive(Debug, Clone, PartialEq)]
pub struct NewStudent {
    pub admission_no: String,
    pub first_name: String,
    pub last_name: String,
    pub class_name: String,
    pub section: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub total_fees: Money,
}

/// Partial update; None leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub class_name: Option<String>,
    pub section: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub status: Option<StudentStatus>,
}

/// List filters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentFilter {
    pub class_name: Option<String>,
    pub status: Option<StudentStatus>,
}

/// Student repository trait for dependency injection.
///
/// By default, all query methods exclude soft-deleted records.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Find active student by ID (excludes soft-deleted)
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Student>>;

    /// Find by admission number, including soft-deleted (for uniqueness checks)
    async fn find_by_admission_no(&self, admission_no: &str) -> AppResult<Option<Student>>;

    /// List students matching the filter, paginated
    async fn list(
        &self,
        filter: StudentFilter,
        page: PaginationParams,
    ) -> AppResult<(Vec<Student>, u64)>;

    /// All non-deleted students, for export and reconciliation
    async fn list_all(&self) -> AppResult<Vec<Student>>;

    /// Create a new student
    async fn create(&self, new: NewStudent) -> AppResult<Student>;

    /// Update student fields (only active students)
    async fn update(&self, id: Uuid, patch: StudentPatch) -> AppResult<Student>;

    /// Overwrite the fee totals; balance is recomputed
    async fn set_fee_totals(&self, id: Uuid, total_fees: Money, paid_fees: Money)
        -> AppResult<Student>;

    /// Soft delete student by ID (sets deleted_at timestamp)
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Restore a soft-deleted student
    async fn restore(&self, id: Uuid) -> AppResult<Student>;
}

/// Concrete implementation of StudentRepository
pub struct StudentStore {
    db: DatabaseConnection,
}

impl StudentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StudentRepository for StudentStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Student>> {
        let result = StudentEntity::find_by_id(id)
            .filter(student::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Student::from))
    }

    async fn find_by_admission_no(&self, admission_no: &str) -> AppResult<Option<Student>> {
        let result = StudentEntity::find()
            .filter(student::Column::AdmissionNo.eq(admission_no))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Student::from))
    }

    async fn list(
        &self,
        filter: StudentFilter,
        page: PaginationParams,
    ) -> AppResult<(Vec<Student>, u64)> {
        let mut query = StudentEntity::find().filter(student::Column::DeletedAt.is_null());

        if let Some(class_name) = filter.class_name {
            query = query.filter(student::Column::ClassName.eq(class_name));
        }
        if let Some(status) = filter.status {
            query = query.filter(student::Column::Status.eq(status.to_string()));
        }

        let paginator = query
            .order_by_asc(student::Column::AdmissionNo)
            .paginate(&self.db, page.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.page.saturating_sub(1)).await?;

        Ok((models.into_iter().map(Student::from).collect(), total))
    }

    async fn list_all(&self) -> AppResult<Vec<Student>> {
        let models = StudentEntity::find()
            .filter(student::Column::DeletedAt.is_null())
            .order_by_asc(student::Column::AdmissionNo)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Student::from).collect())
    }

    async fn create(&self, new: NewStudent) -> AppResult<Student> {
        let now = chrono::Utc::now();
        let total_fees = new.total_fees;
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            admission_no: Set(new.admission_no),
            first_name: Set(new.first_name),
            last_name: Set(new.last_name),
            class_name: Set(new.class_name),
            section: Set(new.section),
            guardian_name: Set(new.guardian_name),
            guardian_phone: Set(new.guardian_phone),
            total_fees: Set(total_fees),
            paid_fees: Set(0),
            fee_balance: Set(Student::recompute_balance(total_fees, 0)),
            status: Set(StudentStatus::Active.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Student::from(model))
    }

    async fn update(&self, id: Uuid, patch: StudentPatch) -> AppResult<Student> {
        let model = StudentEntity::find_by_id(id)
            .filter(student::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = model.into();

        if let Some(first_name) = patch.first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = patch.last_name {
            active.last_name = Set(last_name);
        }
        if let Some(class_name) = patch.class_name {
            active.class_name = Set(class_name);
        }
        if let Some(section) = patch.section {
            active.section = Set(Some(section));
        }
        if let Some(guardian_name) = patch.guardian_name {
            active.guardian_name = Set(Some(guardian_name));
        }
        if let Some(guardian_phone) = patch.guardian_phone {
            active.guardian_phone = Set(Some(guardian_phone));
        }
        if let Some(status) = patch.status {
            active.status = Set(status.to_string());
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Student::from(model))
    }

    async fn set_fee_totals(
        &self,
        id: Uuid,
        total_fees: Money,
        paid_fees: Money,
    ) -> AppResult<Student> {
        let model = StudentEntity::find_by_id(id)
            .filter(student::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = model.into();
        active.total_fees = Set(total_fees);
        active.paid_fees = Set(paid_fees);
        active.fee_balance = Set(Student::recompute_balance(total_fees, paid_fees));
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Student::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let model = StudentEntity::find_by_id(id)
            .filter(student::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = model.into();
        let now = chrono::Utc::now();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);

        active.update(&self.db).await.map_err(AppError::from)?;
        Ok(())
    }

    async fn restore(&self, id: Uuid) -> AppResult<Student> {
        let model = StudentEntity::find_by_id(id)
            .filter(student::Column::DeletedAt.is_not_null())
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::validation("Student is not deleted or does not exist"))?;

        let mut active: ActiveModel = model.into();
        active.deleted_at = Set(None);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Student::from(model))
    }
}
