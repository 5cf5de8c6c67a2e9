//! Student handlers, including CSV import and export.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_permission, CurrentUser};
use crate::api::AppState;
use crate::config::{PERM_MANAGE_STUDENTS, PERM_VIEW_STUDENTS};
use crate::domain::{StudentResponse, StudentStatus};
use crate::errors::AppResult;
use crate::infra::{NewStudent, StudentFilter, StudentPatch};
use crate::services::ImportSummary;
use crate::types::{NoContent, Paginated, PaginationParams};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStudentRequest {
    #[validate(length(min = 1, message = "Admission number is required"))]
    #[schema(example = "ADM-2026-0042")]
    pub admission_no: String,
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(length(min = 1, message = "Class is required"))]
    #[schema(example = "Grade 7")]
    pub class_name: String,
    pub section: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    /// Fees levied at admission, minor units
    #[serde(default)]
    pub total_fees: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStudentRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub class_name: Option<String>,
    pub section: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub status: Option<StudentStatus>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct StudentListQuery {
    pub class_name: Option<String>,
    pub status: Option<StudentStatus>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl StudentListQuery {
    fn split(self) -> (StudentFilter, PaginationParams) {
        let defaults = PaginationParams::default();
        (
            StudentFilter {
                class_name: self.class_name,
                status: self.status,
            },
            PaginationParams {
                page: self.page.unwrap_or(defaults.page),
                per_page: self.per_page.unwrap_or(defaults.per_page),
            },
        )
    }
}

pub fn student_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_students).post(create_student))
        .route("/import", post(import_students))
        .route("/export", get(export_students))
        .route(
            "/:id",
            get(get_student).put(update_student).delete(delete_student),
        )
        .route("/:id/restore", post(restore_student))
}

/// List students with optional class and status filters
#[utoipa::path(
    get,
    path = "/students",
    tag = "Students",
    security(("bearer_auth" = [])),
    params(StudentListQuery),
    responses(
        (status = 200, description = "Paginated students"),
        (status = 403, description = "Missing view_students permission")
    )
)]
pub async fn list_students(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<StudentListQuery>,
) -> AppResult<Json<Paginated<StudentResponse>>> {
    require_permission(&current_user, PERM_VIEW_STUDENTS)?;

    let (filter, page) = query.split();
    let result = state.services.students().list_students(filter, page).await?;

    Ok(Json(Paginated {
        data: result.data.into_iter().map(StudentResponse::from).collect(),
        meta: result.meta,
    }))
}

/// Get one student
#[utoipa::path(
    get,
    path = "/students/{id}",
    tag = "Students",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Student found", body = StudentResponse),
        (status = 404, description = "Student not found")
    )
)]
pub async fn get_student(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<StudentResponse>> {
    require_permission(&current_user, PERM_VIEW_STUDENTS)?;

    let student = state.services.students().get_student(id).await?;
    Ok(Json(StudentResponse::from(student)))
}

/// Enroll a student
#[utoipa::path(
    post,
    path = "/students",
    tag = "Students",
    security(("bearer_auth" = [])),
    request_body = CreateStudentRequest,
    responses(
        (status = 201, description = "Student created", body = StudentResponse),
        (status = 409, description = "Admission number already exists")
    )
)]
pub async fn create_student(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateStudentRequest>,
) -> AppResult<(StatusCode, Json<StudentResponse>)> {
    require_permission(&current_user, PERM_MANAGE_STUDENTS)?;

    let student = state
        .services
        .students()
        .create_student(NewStudent {
            admission_no: payload.admission_no,
            first_name: payload.first_name,
            last_name: payload.last_name,
            class_name: payload.class_name,
            section: payload.section,
            guardian_name: payload.guardian_name,
            guardian_phone: payload.guardian_phone,
            total_fees: payload.total_fees,
        })
        .await?;

    state
        .services
        .audit()
        .record(current_user.id, "create", "student", Some(student.id), None)
        .await;

    Ok((StatusCode::CREATED, Json(StudentResponse::from(student))))
}

/// Update a student
#[utoipa::path(
    put,
    path = "/students/{id}",
    tag = "Students",
    security(("bearer_auth" = [])),
    request_body = UpdateStudentRequest,
    responses(
        (status = 200, description = "Student updated", body = StudentResponse),
        (status = 404, description = "Student not found")
    )
)]
pub async fn update_student(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStudentRequest>,
) -> AppResult<Json<StudentResponse>> {
    require_permission(&current_user, PERM_MANAGE_STUDENTS)?;

    let student = state
        .services
        .students()
        .update_student(
            id,
            StudentPatch {
                first_name: payload.first_name,
                last_name: payload.last_name,
                class_name: payload.class_name,
                section: payload.section,
                guardian_name: payload.guardian_name,
                guardian_phone: payload.guardian_phone,
                status: payload.status,
            },
        )
        .await?;

    state
        .services
        .audit()
        .record(current_user.id, "update", "student", Some(id), None)
        .await;

    Ok(Json(StudentResponse::from(student)))
}

/// Soft delete a student
#[utoipa::path(
    delete,
    path = "/students/{id}",
    tag = "Students",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Student deleted"),
        (status = 404, description = "Student not found")
    )
)]
pub async fn delete_student(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    require_permission(&current_user, PERM_MANAGE_STUDENTS)?;

    state.services.students().delete_student(id).await?;

    state
        .services
        .audit()
        .record(current_user.id, "delete", "student", Some(id), None)
        .await;

    Ok(NoContent)
}

/// Restore a soft-deleted student
#[utoipa::path(
    post,
    path = "/students/{id}/restore",
    tag = "Students",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Student restored", body = StudentResponse),
        (status = 400, description = "Student is not deleted")
    )
)]
pub async fn restore_student(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<StudentResponse>> {
    require_permission(&current_user, PERM_MANAGE_STUDENTS)?;

    let student = state.services.students().restore_student(id).await?;

    state
        .services
        .audit()
        .record(current_user.id, "restore", "student", Some(id), None)
        .await;

    Ok(Json(StudentResponse::from(student)))
}

/// Bulk import students from a CSV body
#[utoipa::path(
    post,
    path = "/students/import",
    tag = "Students",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Import summary", body = ImportSummary),
        (status = 400, description = "Unreadable CSV")
    )
)]
pub async fn import_students(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    body: Bytes,
) -> AppResult<Json<ImportSummary>> {
    require_permission(&current_user, PERM_MANAGE_STUDENTS)?;

    let summary = state.services.students().import_csv(body.to_vec()).await?;

    state
        .services
        .audit()
        .record(
            current_user.id,
            "import",
            "student",
            None,
            Some(format!(
                "imported {}, skipped {}",
                summary.imported, summary.skipped
            )),
        )
        .await;

    Ok(Json(summary))
}

/// Export all students as CSV
#[utoipa::path(
    get,
    path = "/students/export",
    tag = "Students",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "CSV document", content_type = "text/csv")
    )
)]
pub async fn export_students(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Response> {
    require_permission(&current_user, PERM_VIEW_STUDENTS)?;

    let csv = state.services.students().export_csv().await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"students.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}
