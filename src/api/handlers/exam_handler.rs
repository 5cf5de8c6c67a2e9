//! Exam and result handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_permission, CurrentUser};
use crate::api::AppState;
use crate::config::PERM_MANAGE_EXAMS;
use crate::domain::{Exam, ExamResultResponse};
use crate::errors::AppResult;
use crate::infra::{ExamPatch, NewExam};
use crate::types::NoContent;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateExamRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Midterm 2026")]
    pub name: String,
    #[validate(length(min = 1, message = "Class is required"))]
    pub class_name: String,
    #[validate(length(min = 1, message = "Subject is required"))]
    pub subject: String,
    pub date: NaiveDate,
    #[schema(example = 100)]
    pub max_marks: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateExamRequest {
    pub name: Option<String>,
    pub subject: Option<String>,
    pub date: Option<NaiveDate>,
    pub max_marks: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecordResultRequest {
    pub student_id: Uuid,
    pub marks: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BulkResultsRequest {
    #[validate(length(min = 1, message = "At least one result is required"))]
    pub results: Vec<RecordResultRequest>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ExamListQuery {
    pub class_name: Option<String>,
}

pub fn exam_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_exams).post(create_exam))
        .route("/:id", get(get_exam).put(update_exam).delete(delete_exam))
        .route("/:id/results", get(exam_results).post(record_result))
        .route("/:id/results/bulk", post(record_results_bulk))
}

pub fn result_routes() -> Router<AppState> {
    Router::new().route("/student/:student_id", get(student_results))
}

/// List exams, optionally filtered by class
#[utoipa::path(
    get,
    path = "/exams",
    tag = "Exams",
    security(("bearer_auth" = [])),
    params(ExamListQuery),
    responses(
        (status = 200, description = "Exams", body = [Exam])
    )
)]
pub async fn list_exams(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<ExamListQuery>,
) -> AppResult<Json<Vec<Exam>>> {
    require_permission(&current_user, PERM_MANAGE_EXAMS)?;

    let exams = state.services.exams().list_exams(query.class_name).await?;
    Ok(Json(exams))
}

/// Get one exam
#[utoipa::path(
    get,
    path = "/exams/{id}",
    tag = "Exams",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Exam found", body = Exam),
        (status = 404, description = "Exam not found")
    )
)]
pub async fn get_exam(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Exam>> {
    require_permission(&current_user, PERM_MANAGE_EXAMS)?;

    let exam = state.services.exams().get_exam(id).await?;
    Ok(Json(exam))
}

/// Schedule an exam
#[utoipa::path(
    post,
    path = "/exams",
    tag = "Exams",
    security(("bearer_auth" = [])),
    request_body = CreateExamRequest,
    responses(
        (status = 201, description = "Exam created", body = Exam),
        (status = 400, description = "Invalid max_marks")
    )
)]
pub async fn create_exam(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateExamRequest>,
) -> AppResult<(StatusCode, Json<Exam>)> {
    require_permission(&current_user, PERM_MANAGE_EXAMS)?;

    let exam = state
        .services
        .exams()
        .create_exam(NewExam {
            name: payload.name,
            class_name: payload.class_name,
            subject: payload.subject,
            date: payload.date,
            max_marks: payload.max_marks,
        })
        .await?;

    state
        .services
        .audit()
        .record(current_user.id, "create", "exam", Some(exam.id), None)
        .await;

    Ok((StatusCode::CREATED, Json(exam)))
}

/// Update an exam
#[utoipa::path(
    put,
    path = "/exams/{id}",
    tag = "Exams",
    security(("bearer_auth" = [])),
    request_body = UpdateExamRequest,
    responses(
        (status = 200, description = "Exam updated", body = Exam),
        (status = 404, description = "Exam not found")
    )
)]
pub async fn update_exam(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateExamRequest>,
) -> AppResult<Json<Exam>> {
    require_permission(&current_user, PERM_MANAGE_EXAMS)?;

    let exam = state
        .services
        .exams()
        .update_exam(
            id,
            ExamPatch {
                name: payload.name,
                subject: payload.subject,
                date: payload.date,
                max_marks: payload.max_marks,
            },
        )
        .await?;

    state
        .services
        .audit()
        .record(current_user.id, "update", "exam", Some(id), None)
        .await;

    Ok(Json(exam))
}

/// Delete an exam and its results
#[utoipa::path(
    delete,
    path = "/exams/{id}",
    tag = "Exams",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Exam deleted"),
        (status = 404, description = "Exam not found")
    )
)]
pub async fn delete_exam(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    require_permission(&current_user, PERM_MANAGE_EXAMS)?;

    state.services.exams().delete_exam(id).await?;

    state
        .services
        .audit()
        .record(current_user.id, "delete", "exam", Some(id), None)
        .await;

    Ok(NoContent)
}

/// Record one student's marks for an exam
#[utoipa::path(
    post,
    path = "/exams/{id}/results",
    tag = "Exams",
    security(("bearer_auth" = [])),
    request_body = RecordResultRequest,
    responses(
        (status = 201, description = "Result recorded", body = ExamResultResponse),
        (status = 400, description = "Marks out of range or wrong class"),
        (status = 404, description = "Exam or student not found")
    )
)]
pub async fn record_result(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecordResultRequest>,
) -> AppResult<(StatusCode, Json<ExamResultResponse>)> {
    require_permission(&current_user, PERM_MANAGE_EXAMS)?;

    let result = state
        .services
        .exams()
        .record_result(id, payload.student_id, payload.marks)
        .await?;

    Ok((StatusCode::CREATED, Json(ExamResultResponse::from(result))))
}

/// Record a whole mark sheet for an exam in one call.
///
/// Entries are written in order and the call stops at the first bad
/// one; results recorded before it stay recorded. Re-submitting the
/// corrected sheet is safe since a result per (exam, student) is an
/// upsert.
#[utoipa::path(
    post,
    path = "/exams/{id}/results/bulk",
    tag = "Exams",
    security(("bearer_auth" = [])),
    request_body = BulkResultsRequest,
    responses(
        (status = 201, description = "Results recorded", body = [ExamResultResponse]),
        (status = 400, description = "Marks out of range or wrong class; entries before the failing one stay recorded"),
        (status = 404, description = "Exam or student not found")
    )
)]
pub async fn record_results_bulk(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<BulkResultsRequest>,
) -> AppResult<(StatusCode, Json<Vec<ExamResultResponse>>)> {
    require_permission(&current_user, PERM_MANAGE_EXAMS)?;

    let mut recorded = Vec::with_capacity(payload.results.len());
    for entry in payload.results {
        let result = state
            .services
            .exams()
            .record_result(id, entry.student_id, entry.marks)
            .await?;
        recorded.push(ExamResultResponse::from(result));
    }

    state
        .services
        .audit()
        .record(
            current_user.id,
            "record results",
            "exam",
            Some(id),
            Some(format!("{} result(s)", recorded.len())),
        )
        .await;

    Ok((StatusCode::CREATED, Json(recorded)))
}

/// All results for an exam
#[utoipa::path(
    get,
    path = "/exams/{id}/results",
    tag = "Exams",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Results", body = [ExamResultResponse]),
        (status = 404, description = "Exam not found")
    )
)]
pub async fn exam_results(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<ExamResultResponse>>> {
    require_permission(&current_user, PERM_MANAGE_EXAMS)?;

    let results = state.services.exams().results_for_exam(id).await?;
    Ok(Json(
        results.into_iter().map(ExamResultResponse::from).collect(),
    ))
}

/// One student's results across all exams
#[utoipa::path(
    get,
    path = "/results/student/{student_id}",
    tag = "Exams",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Results", body = [ExamResultResponse])
    )
)]
pub async fn student_results(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(student_id): Path<Uuid>,
) -> AppResult<Json<Vec<ExamResultResponse>>> {
    require_permission(&current_user, PERM_MANAGE_EXAMS)?;

    let results = state
        .services
        .exams()
        .results_for_student(student_id)
        .await?;
    Ok(Json(
        results.into_iter().map(ExamResultResponse::from).collect(),
    ))
}
