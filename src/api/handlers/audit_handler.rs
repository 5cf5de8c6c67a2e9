//! Audit log handlers.

use axum::{extract::State, response::Json, routing::get, Extension, Router};

use crate::api::middleware::{require_permission, CurrentUser};
use crate::api::AppState;
use crate::config::PERM_MANAGE_USERS;
use crate::domain::AuditLog;
use crate::errors::AppResult;

pub fn audit_routes() -> Router<AppState> {
    Router::new().route("/", get(list_audit_logs))
}

/// Most recent audit entries, newest first
#[utoipa::path(
    get,
    path = "/audit",
    tag = "Audit",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Recent audit entries", body = [AuditLog]),
        (status = 403, description = "Missing manage_users permission")
    )
)]
pub async fn list_audit_logs(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<AuditLog>>> {
    require_permission(&current_user, PERM_MANAGE_USERS)?;

    let logs = state.services.audit().list_recent().await?;
    Ok(Json(logs))
}
