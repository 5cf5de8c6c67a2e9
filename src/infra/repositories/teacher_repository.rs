//! Teacher repository with soft delete support.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::teacher::{self, ActiveModel, Entity as TeacherEntity};
use crate::domain::{Money, Teacher, TeacherStatus};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Fields for creating a teacher
#[derive(Debug, Clone, PartialEq)]
pub struct NewTeacher {
    pub staff_no: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub salary: Money,
}

/// Partial update; None leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeacherPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub salary: Option<Money>,
    pub status: Option<TeacherStatus>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TeacherRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Teacher>>;

    /// Find by staff number, including soft-deleted (for uniqueness checks)
    async fn find_by_staff_no(&self, staff_no: &str) -> AppResult<Option<Teacher>>;

    async fn list(&self) -> AppResult<Vec<Teacher>>;

    /// Active teachers only; the payroll generator iterates this
    async fn list_active(&self) -> AppResult<Vec<Teacher>>;

    async fn create(&self, new: NewTeacher) -> AppResult<Teacher>;

    async fn update(&self, id: Uuid, patch: TeacherPatch) -> AppResult<Teacher>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    async fn restore(&self, id: Uuid) -> AppResult<Teacher>;
}

/// Concrete implementation of TeacherRepository
pub struct TeacherStore {
    db: DatabaseConnection,
}

impl TeacherStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TeacherRepository for TeacherStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Teacher>> {
        let result = TeacherEntity::find_by_id(id)
            .filter(teacher::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Teacher::from))
    }

    async fn find_by_staff_no(&self, staff_no: &str) -> AppResult<Option<Teacher>> {
        let result = TeacherEntity::find()
            .filter(teacher::Column::StaffNo.eq(staff_no))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Teacher::from))
    }

    async fn list(&self) -> AppResult<Vec<Teacher>> {
        let models = TeacherEntity::find()
            .filter(teacher::Column::DeletedAt.is_null())
            .order_by_asc(teacher::Column::StaffNo)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Teacher::from).collect())
    }

    async fn list_active(&self) -> AppResult<Vec<Teacher>> {
        let models = TeacherEntity::find()
            .filter(teacher::Column::DeletedAt.is_null())
            .filter(teacher::Column::Status.eq(TeacherStatus::Active.to_string()))
            .order_by_asc(teacher::Column::StaffNo)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Teacher::from).collect())
    }

    async fn create(&self, new: NewTeacher) -> AppResult<Teacher> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            staff_no: Set(new.staff_no),
            name: Set(new.name),
            email: Set(new.email),
            phone: Set(new.phone),
            subject: Set(new.subject),
            salary: Set(new.salary),
            status: Set(TeacherStatus::Active.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Teacher::from(model))
    }

    async fn update(&self, id: Uuid, patch: TeacherPatch) -> AppResult<Teacher> {
        let model = TeacherEntity::find_by_id(id)
            .filter(teacher::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = model.into();

        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(email) = patch.email {
            active.email = Set(Some(email));
        }
        if let Some(phone) = patch.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(subject) = patch.subject {
            active.subject = Set(Some(subject));
        }
        if let Some(salary) = patch.salary {
            active.salary = Set(salary);
        }
        if let Some(status) = patch.status {
            active.status = Set(status.to_string());
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Teacher::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let model = TeacherEntity::find_by_id(id)
            .filter(teacher::Column::DeletedAt.is_null())
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

    async fn restore(&self, id: Uuid) -> AppResult<Teacher> {
        let model = TeacherEntity::find_by_id(id)
            .filter(teacher::Column::DeletedAt.is_not_null())
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::validation("Teacher is not deleted or does not exist"))?;

        let mut active: ActiveModel = model.into();
        active.deleted_at = Set(None);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Teacher::from(model))
    }
}
