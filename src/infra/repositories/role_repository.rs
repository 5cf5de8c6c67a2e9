//! Role repository. Permissions are persisted as a JSON string array.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::role::{self, ActiveModel, Entity as RoleEntity};
use crate::domain::Role;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Role>>;

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>>;

    async fn list(&self) -> AppResult<Vec<Role>>;

    async fn create(&self, name: String, permissions: Vec<String>) -> AppResult<Role>;

    async fn update(
        &self,
        id: Uuid,
        name: Option<String>,
        permissions: Option<Vec<String>>,
    ) -> AppResult<Role>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of RoleRepository
pub struct RoleStore {
    db: DatabaseConnection,
}

impl RoleStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn permissions_json(permissions: Vec<String>) -> serde_json::Value {
    serde_json::Value::Array(
        permissions
            .into_iter()
            .map(serde_json::Value::String)
            .collect(),
    )
}

#[async_trait]
impl RoleRepository for RoleStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Role>> {
        let result = RoleEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Role::from))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        let result = RoleEntity::find()
            .filter(role::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Role::from))
    }

    async fn list(&self) -> AppResult<Vec<Role>> {
        let models = RoleEntity::find()
            .order_by_asc(role::Column::Name)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Role::from).collect())
    }

    async fn create(&self, name: String, permissions: Vec<String>) -> AppResult<Role> {
        let active = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            permissions: Set(permissions_json(permissions)),
        };

        let model = active.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Role::from(model))
    }

    async fn update(
        &self,
        id: Uuid,
        name: Option<String>,
        permissions: Option<Vec<String>>,
    ) -> AppResult<Role> {
        let model = RoleEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = model.into();

        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(permissions) = permissions {
            active.permissions = Set(permissions_json(permissions));
        }

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Role::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = RoleEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
