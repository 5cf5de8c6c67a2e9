//! User and role domain entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::ROLE_ADMIN;

/// A named set of permissions assignable to users.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Role {
    pub id: Uuid,
    /// Unique role name ("admin" implies every permission)
    pub name: String,
    pub permissions: Vec<String>,
}

impl Role {
    /// Check whether this role grants a permission.
    pub fn grants(&self, permission: &str) -> bool {
        self.name == ROLE_ADMIN || self.permissions.iter().any(|p| p == permission)
    }
}

/// Staff account that can sign in to the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub role_id: Uuid,
    /// Denormalized from the role row when loading
    pub role_name: String,
    pub permissions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft delete timestamp (None = active, Some = deleted)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role_name == ROLE_ADMIN
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.is_admin() || self.permissions.iter().any(|p| p == permission)
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "clerk@school.test")]
    pub email: String,
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "accountant")]
    pub role: String,
    pub permissions: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role_name,
            permissions: user.permissions,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(name: &str, perms: &[&str]) -> Role {
        Role {
            id: Uuid::new_v4(),
            name: name.to_string(),
            permissions: perms.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn admin_role_grants_everything() {
        let admin = role(ROLE_ADMIN, &[]);
        assert!(admin.grants("manage_finance"));
        assert!(admin.grants("anything_at_all"));
    }

    #[test]
    fn plain_role_grants_only_listed() {
        let clerk = role("clerk", &["manage_fees"]);
        assert!(clerk.grants("manage_fees"));
        assert!(!clerk.grants("manage_users"));
    }
}
