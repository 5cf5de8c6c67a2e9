//! User and role administration.
//!
//! Role deletion is blocked while users still hold the role, and the
//! admin role itself can never be renamed or removed.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{is_known_permission, ROLE_ADMIN};
use crate::domain::{Password, Role, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    async fn list_users(&self) -> AppResult<Vec<User>>;

    async fn create_user(
        &self,
        email: String,
        password: String,
        name: String,
        role_id: Uuid,
    ) -> AppResult<User>;

    async fn update_user(
        &self,
        id: Uuid,
        name: Option<String>,
        role_id: Option<Uuid>,
        password: Option<String>,
    ) -> AppResult<User>;

    /// Soft delete a user (sets deleted_at timestamp)
    async fn delete_user(&self, id: Uuid) -> AppResult<()>;

    /// Restore a soft-deleted user
    async fn restore_user(&self, id: Uuid) -> AppResult<User>;

    async fn list_roles(&self) -> AppResult<Vec<Role>>;

    async fn get_role(&self, id: Uuid) -> AppResult<Role>;

    async fn create_role(&self, name: String, permissions: Vec<String>) -> AppResult<Role>;

    async fn update_role(
        &self,
        id: Uuid,
        name: Option<String>,
        permissions: Option<Vec<String>>,
    ) -> AppResult<Role>;

    async fn delete_role(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    fn check_permissions(permissions: &[String]) -> AppResult<()> {
        for permission in permissions {
            if !is_known_permission(permission) {
                return Err(AppError::validation(format!(
                    "Unknown permission: {}",
                    permission
                )));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.uow.users().list().await
    }

    async fn create_user(
        &self,
        email: String,
        password: String,
        name: String,
        role_id: Uuid,
    ) -> AppResult<User> {
        // Includes soft-deleted to prevent email reuse
        if self.uow.users().find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("User"));
        }

        if self.uow.roles().find_by_id(role_id).await?.is_none() {
            return Err(AppError::validation("Role does not exist"));
        }

        let password_hash = Password::new(&password)?.into_string();
        self.uow
            .users()
            .create(email, password_hash, name, role_id)
            .await
    }

    async fn update_user(
        &self,
        id: Uuid,
        name: Option<String>,
        role_id: Option<Uuid>,
        password: Option<String>,
    ) -> AppResult<User> {
        if let Some(role_id) = role_id {
            if self.uow.roles().find_by_id(role_id).await?.is_none() {
                return Err(AppError::validation("Role does not exist"));
            }
        }

        let password_hash = match password {
            Some(plain) => Some(Password::new(&plain)?.into_string()),
            None => None,
        };

        self.uow
            .users()
            .update(id, name, role_id, password_hash)
            .await
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        self.uow.users().delete(id).await
    }

    async fn restore_user(&self, id: Uuid) -> AppResult<User> {
        self.uow.users().restore(id).await
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        self.uow.roles().list().await
    }

    async fn get_role(&self, id: Uuid) -> AppResult<Role> {
        self.uow
            .roles()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn create_role(&self, name: String, permissions: Vec<String>) -> AppResult<Role> {
        Self::check_permissions(&permissions)?;

        if self.uow.roles().find_by_name(&name).await?.is_some() {
            return Err(AppError::conflict("Role"));
        }

        self.uow.roles().create(name, permissions).await
    }

    async fn update_role(
        &self,
        id: Uuid,
        name: Option<String>,
        permissions: Option<Vec<String>>,
    ) -> AppResult<Role> {
        let role = self.get_role(id).await?;

        if role.name == ROLE_ADMIN && name.as_deref().is_some_and(|n| n != ROLE_ADMIN) {
            return Err(AppError::validation("The admin role cannot be renamed"));
        }

        if let Some(new_name) = &name {
            if *new_name != role.name && self.uow.roles().find_by_name(new_name).await?.is_some() {
                return Err(AppError::conflict("Role"));
            }
        }

        if let Some(permissions) = &permissions {
            Self::check_permissions(permissions)?;
        }

        self.uow.roles().update(id, name, permissions).await
    }

    async fn delete_role(&self, id: Uuid) -> AppResult<()> {
        let role = self.get_role(id).await?;

        if role.name == ROLE_ADMIN {
            return Err(AppError::validation("The admin role cannot be deleted"));
        }

        let holders = self.uow.users().count_with_role(id).await?;
        if holders > 0 {
            return Err(AppError::BadRequest(
                "Role is still assigned to users".to_string(),
            ));
        }

        self.uow.roles().delete(id).await
    }
}
