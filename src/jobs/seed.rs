//! First-run seeding.
//!
//! Creates the admin role and an initial admin user so a fresh install
//! can log in. Safe to re-run: existing rows are left untouched.

use crate::config::{ALL_PERMISSIONS, ROLE_ADMIN};
use crate::domain::Password;
use crate::errors::AppResult;
use crate::infra::UnitOfWork;

/// Ensure the admin role and an admin user exist.
pub async fn run<U: UnitOfWork>(uow: &U, email: String, password: String) -> AppResult<()> {
    let role = match uow.roles().find_by_name(ROLE_ADMIN).await? {
        Some(role) => role,
        None => {
            let permissions = ALL_PERMISSIONS.iter().map(|p| p.to_string()).collect();
            let role = uow.roles().create(ROLE_ADMIN.to_string(), permissions).await?;
            tracing::info!("admin role created");
            role
        }
    };

    if uow.users().find_by_email(&email).await?.is_some() {
        tracing::info!(%email, "admin user already exists, nothing to do");
        return Ok(());
    }

    let hash = Password::new(&password)?.into_string();
    let user = uow
        .users()
        .create(email, hash, "Administrator".to_string(), role.id)
        .await?;

    tracing::info!(user_id = %user.id, "admin user created");
    Ok(())
}
