//! Teacher handlers.

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
use crate::config::{PERM_MANAGE_TEACHERS, PERM_VIEW_TEACHERS};
use crate::domain::{Teacher, TeacherStatus};
use crate::errors::AppResult;
use crate::infra::{NewTeacher, TeacherPatch};
use crate::types::NoContent;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTeacherRequest {
    #[validate(length(min = 1, message = "Staff number is required"))]
    #[schema(example = "STF-017")]
    pub staff_no: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub subject: Option<String>,
    /// Monthly base salary, minor units
    #[serde(default)]
    pub salary: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTeacherRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub salary: Option<i64>,
    pub status: Option<TeacherStatus>,
}

pub fn teacher_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_teachers).post(create_teacher))
        .route(
            "/:id",
            get(get_teacher).put(update_teacher).delete(delete_teacher),
        )
        .route("/:id/restore", post(restore_teacher))
}

/// List teachers
#[utoipa::path(
    get,
    path = "/teachers",
    tag = "Teachers",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All teachers", body = [Teacher]),
        (status = 403, description = "Missing view_teachers permission")
    )
)]
pub async fn list_teachers(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Teacher>>> {
    require_permission(&current_user, PERM_VIEW_TEACHERS)?;

    let teachers = state.services.teachers().list_teachers().await?;
    Ok(Json(teachers))
}

/// Get one teacher
#[utoipa::path(
    get,
    path = "/teachers/{id}",
    tag = "Teachers",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Teacher found", body = Teacher),
        (status = 404, description = "Teacher not found")
    )
)]
pub async fn get_teacher(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Teacher>> {
    require_permission(&current_user, PERM_VIEW_TEACHERS)?;

    let teacher = state.services.teachers().get_teacher(id).await?;
    Ok(Json(teacher))
}

/// Hire a teacher
#[utoipa::path(
    post,
    path = "/teachers",
    tag = "Teachers",
    security(("bearer_auth" = [])),
    request_body = CreateTeacherRequest,
    responses(
        (status = 201, description = "Teacher created", body = Teacher),
        (status = 409, description = "Staff number already exists")
    )
)]
pub async fn create_teacher(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateTeacherRequest>,
) -> AppResult<(StatusCode, Json<Teacher>)> {
    require_permission(&current_user, PERM_MANAGE_TEACHERS)?;

    let teacher = state
        .services
        .teachers()
        .create_teacher(NewTeacher {
            staff_no: payload.staff_no,
            name: payload.name,
            email: payload.email,
            phone: payload.phone,
            subject: payload.subject,
            salary: payload.salary,
        })
        .await?;

    state
        .services
        .audit()
        .record(current_user.id, "create", "teacher", Some(teacher.id), None)
        .await;

    Ok((StatusCode::CREATED, Json(teacher)))
}

/// Update a teacher
#[utoipa::path(
    put,
    path = "/teachers/{id}",
    tag = "Teachers",
    security(("bearer_auth" = [])),
    request_body = UpdateTeacherRequest,
    responses(
        (status = 200, description = "Teacher updated", body = Teacher),
        (status = 404, description = "Teacher not found")
    )
)]
pub async fn update_teacher(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTeacherRequest>,
) -> AppResult<Json<Teacher>> {
    require_permission(&current_user, PERM_MANAGE_TEACHERS)?;

    let teacher = state
        .services
        .teachers()
        .update_teacher(
            id,
            TeacherPatch {
                name: payload.name,
                email: payload.email,
                phone: payload.phone,
                subject: payload.subject,
                salary: payload.salary,
                status: payload.status,
            },
        )
        .await?;

    state
        .services
        .audit()
        .record(current_user.id, "update", "teacher", Some(id), None)
        .await;

    Ok(Json(teacher))
}

/// Soft delete a teacher
#[utoipa::path(
    delete,
    path = "/teachers/{id}",
    tag = "Teachers",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Teacher deleted"),
        (status = 404, description = "Teacher not found")
    )
)]
pub async fn delete_teacher(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    require_permission(&current_user, PERM_MANAGE_TEACHERS)?;

    state.services.teachers().delete_teacher(id).await?;

    state
        .services
        .audit()
        .record(current_user.id, "delete", "teacher", Some(id), None)
        .await;

    Ok(NoContent)
}

/// Restore a soft-deleted teacher
#[utoipa::path(
    post,
    path = "/teachers/{id}/restore",
    tag = "Teachers",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Teacher restored", body = Teacher),
        (status = 400, description = "Teacher is not deleted")
    )
)]
pub async fn restore_teacher(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Teacher>> {
    require_permission(&current_user, PERM_MANAGE_TEACHERS)?;

    let teacher = state.services.teachers().restore_teacher(id).await?;

    state
        .services
        .audit()
        .record(current_user.id, "restore", "teacher", Some(id), None)
        .await;

    Ok(Json(teacher))
}
