//! User and role administration handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_permission, CurrentUser};
use crate::api::AppState;
use crate::config::PERM_MANAGE_USERS;
use crate::domain::{Role, UserResponse};
use crate::errors::AppResult;
use crate::types::NoContent;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "clerk@school.test")]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub role_id: Uuid,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    pub role_id: Option<Uuid>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRoleRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "accountant")]
    pub name: String,
    pub permissions: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRoleRequest {
    pub name: Option<String>,
    pub permissions: Option<Vec<String>>,
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
        .route("/:id/restore", post(restore_user))
}

pub fn role_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_roles).post(create_role))
        .route("/:id", get(get_role).put(update_role).delete(delete_role))
}

/// List user accounts
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All users", body = [UserResponse]),
        (status = 403, description = "Missing manage_users permission")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<UserResponse>>> {
    require_permission(&current_user, PERM_MANAGE_USERS)?;

    let users = state.services.users().list_users().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Get one user
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    require_permission(&current_user, PERM_MANAGE_USERS)?;

    let user = state.services.users().get_user(id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Create a user account
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    require_permission(&current_user, PERM_MANAGE_USERS)?;

    let user = state
        .services
        .users()
        .create_user(payload.email, payload.password, payload.name, payload.role_id)
        .await?;

    state
        .services
        .audit()
        .record(current_user.id, "create", "user", Some(user.id), None)
        .await;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Update a user account
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    require_permission(&current_user, PERM_MANAGE_USERS)?;

    let user = state
        .services
        .users()
        .update_user(id, payload.name, payload.role_id, payload.password)
        .await?;

    state
        .services
        .audit()
        .record(current_user.id, "update", "user", Some(id), None)
        .await;

    Ok(Json(UserResponse::from(user)))
}

/// Soft delete a user account
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    require_permission(&current_user, PERM_MANAGE_USERS)?;

    state.services.users().delete_user(id).await?;

    state
        .services
        .audit()
        .record(current_user.id, "delete", "user", Some(id), None)
        .await;

    Ok(NoContent)
}

/// Restore a soft-deleted user account
#[utoipa::path(
    post,
    path = "/users/{id}/restore",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User restored", body = UserResponse),
        (status = 400, description = "User is not deleted")
    )
)]
pub async fn restore_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    require_permission(&current_user, PERM_MANAGE_USERS)?;

    let user = state.services.users().restore_user(id).await?;

    state
        .services
        .audit()
        .record(current_user.id, "restore", "user", Some(id), None)
        .await;

    Ok(Json(UserResponse::from(user)))
}

/// List roles
#[utoipa::path(
    get,
    path = "/roles",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All roles", body = [Role])
    )
)]
pub async fn list_roles(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Role>>> {
    require_permission(&current_user, PERM_MANAGE_USERS)?;

    let roles = state.services.users().list_roles().await?;
    Ok(Json(roles))
}

/// Get one role
#[utoipa::path(
    get,
    path = "/roles/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Role found", body = Role),
        (status = 404, description = "Role not found")
    )
)]
pub async fn get_role(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Role>> {
    require_permission(&current_user, PERM_MANAGE_USERS)?;

    let role = state.services.users().get_role(id).await?;
    Ok(Json(role))
}

/// Create a role
#[utoipa::path(
    post,
    path = "/roles",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = CreateRoleRequest,
    responses(
        (status = 201, description = "Role created", body = Role),
        (status = 400, description = "Unknown permission"),
        (status = 409, description = "Role name already exists")
    )
)]
pub async fn create_role(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateRoleRequest>,
) -> AppResult<(StatusCode, Json<Role>)> {
    require_permission(&current_user, PERM_MANAGE_USERS)?;

    let role = state
        .services
        .users()
        .create_role(payload.name, payload.permissions)
        .await?;

    state
        .services
        .audit()
        .record(current_user.id, "create", "role", Some(role.id), None)
        .await;

    Ok((StatusCode::CREATED, Json(role)))
}

/// Update a role
#[utoipa::path(
    put,
    path = "/roles/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = Role),
        (status = 404, description = "Role not found")
    )
)]
pub async fn update_role(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRoleRequest>,
) -> AppResult<Json<Role>> {
    require_permission(&current_user, PERM_MANAGE_USERS)?;

    let role = state
        .services
        .users()
        .update_role(id, payload.name, payload.permissions)
        .await?;

    state
        .services
        .audit()
        .record(current_user.id, "update", "role", Some(id), None)
        .await;

    Ok(Json(role))
}

/// Delete an unassigned role
#[utoipa::path(
    delete,
    path = "/roles/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Role deleted"),
        (status = 400, description = "Role still assigned to users"),
        (status = 404, description = "Role not found")
    )
)]
pub async fn delete_role(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    require_permission(&current_user, PERM_MANAGE_USERS)?;

    state.services.users().delete_role(id).await?;

    state
        .services
        .audit()
        .record(current_user.id, "delete", "role", Some(id), None)
        .await;

    Ok(NoContent)
}
