//! User repository with soft delete support.
//!
//! Users are always returned together with their role so the domain
//! entity carries the role name and permission set.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::role::Entity as RoleEntity;
use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::User;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find by email, including soft-deleted (for uniqueness checks)
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn list(&self) -> AppResult<Vec<User>>;

    async fn create(
        &self,
        email: String,
        password_hash: String,
        name: String,
        role_id: Uuid,
    ) -> AppResult<User>;

    async fn update(
        &self,
        id: Uuid,
        name: Option<String>,
        role_id: Option<Uuid>,
        password_hash: Option<String>,
    ) -> AppResult<User>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Clear the soft-delete marker
    async fn restore(&self, id: Uuid) -> AppResult<User>;

    /// Users holding a given role; blocks role deletion while non-empty
    async fn count_with_role(&self, role_id: Uuid) -> AppResult<u64>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn with_role(&self, model: user::Model) -> AppResult<User> {
        let role = RoleEntity::find_by_id(model.role_id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::internal("User references a missing role"))?;

        Ok(User::from((model, role)))
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .filter(user::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        match result {
            Some(model) => Ok(Some(self.with_role(model).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        match result {
            Some(model) => Ok(Some(self.with_role(model).await?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .filter(user::Column::DeletedAt.is_null())
            .order_by_asc(user::Column::Email)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        let mut users = Vec::with_capacity(models.len());
        for model in models {
            users.push(self.with_role(model).await?);
        }
        Ok(users)
    }

    async fn create(
        &self,
        email: String,
        password_hash: String,
        name: String,
        role_id: Uuid,
    ) -> AppResult<User> {
        let now = chrono::Utc::now();
        let active = ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email),
            password_hash: Set(password_hash),
            name: Set(name),
            role_id: Set(role_id),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        };

        let model = active.insert(&self.db).await.map_err(AppError::from)?;
        self.with_role(model).await
    }

    async fn update(
        &self,
        id: Uuid,
        name: Option<String>,
        role_id: Option<Uuid>,
        password_hash: Option<String>,
    ) -> AppResult<User> {
        let model = UserEntity::find_by_id(id)
            .filter(user::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = model.into();

        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(role_id) = role_id {
            active.role_id = Set(role_id);
        }
        if let Some(password_hash) = password_hash {
            active.password_hash = Set(password_hash);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        self.with_role(model).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let model = UserEntity::find_by_id(id)
            .filter(user::Column::DeletedAt.is_null())
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

    async fn restore(&self, id: Uuid) -> AppResult<User> {
        let model = UserEntity::find_by_id(id)
            .filter(user::Column::DeletedAt.is_not_null())
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::validation("User is not deleted or does not exist"))?;

        let mut active: ActiveModel = model.into();
        active.deleted_at = Set(None);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        self.with_role(model).await
    }

    async fn count_with_role(&self, role_id: Uuid) -> AppResult<u64> {
        use sea_orm::PaginatorTrait;

        let count = UserEntity::find()
            .filter(user::Column::RoleId.eq(role_id))
            .filter(user::Column::DeletedAt.is_null())
            .count(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(count)
    }
}
