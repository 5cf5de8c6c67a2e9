//! Timetable handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Extension, Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_permission, CurrentUser};
use crate::api::AppState;
use crate::config::PERM_MANAGE_TIMETABLE;
use crate::domain::TimetableEntry;
use crate::errors::AppResult;
use crate::infra::{NewTimetableEntry, TimetableEntryPatch};
use crate::types::NoContent;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEntryRequest {
    #[validate(length(min = 1, message = "Class is required"))]
    #[schema(example = "Grade 7")]
    pub class_name: String,
    /// 0 = Sunday through 6 = Saturday
    #[schema(example = 1)]
    pub day_of_week: i16,
    /// 1-based lesson period
    #[schema(example = 3)]
    pub period: i16,
    #[validate(length(min = 1, message = "Subject is required"))]
    pub subject: String,
    pub teacher_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateEntryRequest {
    pub subject: Option<String>,
    pub teacher_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct TimetableListQuery {
    pub class_name: Option<String>,
    pub teacher_id: Option<Uuid>,
}

pub fn timetable_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_entries).post(create_entry))
        .route("/:id", get(get_entry).put(update_entry).delete(delete_entry))
}

/// List timetable entries by class or teacher
#[utoipa::path(
    get,
    path = "/timetable",
    tag = "Timetable",
    security(("bearer_auth" = [])),
    params(TimetableListQuery),
    responses(
        (status = 200, description = "Entries", body = [TimetableEntry])
    )
)]
pub async fn list_entries(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<TimetableListQuery>,
) -> AppResult<Json<Vec<TimetableEntry>>> {
    require_permission(&current_user, PERM_MANAGE_TIMETABLE)?;

    let entries = state
        .services
        .timetable()
        .list_entries(query.class_name, query.teacher_id)
        .await?;
    Ok(Json(entries))
}

/// Get one timetable entry
#[utoipa::path(
    get,
    path = "/timetable/{id}",
    tag = "Timetable",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Entry found", body = TimetableEntry),
        (status = 404, description = "Entry not found")
    )
)]
pub async fn get_entry(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<TimetableEntry>> {
    require_permission(&current_user, PERM_MANAGE_TIMETABLE)?;

    let entry = state.services.timetable().get_entry(id).await?;
    Ok(Json(entry))
}

/// Create a timetable entry
#[utoipa::path(
    post,
    path = "/timetable",
    tag = "Timetable",
    security(("bearer_auth" = [])),
    request_body = CreateEntryRequest,
    responses(
        (status = 201, description = "Entry created", body = TimetableEntry),
        (status = 400, description = "Invalid slot or unknown teacher"),
        (status = 409, description = "Slot or teacher already booked")
    )
)]
pub async fn create_entry(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateEntryRequest>,
) -> AppResult<(StatusCode, Json<TimetableEntry>)> {
    require_permission(&current_user, PERM_MANAGE_TIMETABLE)?;

    let entry = state
        .services
        .timetable()
        .create_entry(NewTimetableEntry {
            class_name: payload.class_name,
            day_of_week: payload.day_of_week,
            period: payload.period,
            subject: payload.subject,
            teacher_id: payload.teacher_id,
        })
        .await?;

    state
        .services
        .audit()
        .record(current_user.id, "create", "timetable_entry", Some(entry.id), None)
        .await;

    Ok((StatusCode::CREATED, Json(entry)))
}

/// Update a timetable entry's subject or teacher
#[utoipa::path(
    put,
    path = "/timetable/{id}",
    tag = "Timetable",
    security(("bearer_auth" = [])),
    request_body = UpdateEntryRequest,
    responses(
        (status = 200, description = "Entry updated", body = TimetableEntry),
        (status = 404, description = "Entry not found"),
        (status = 409, description = "Teacher already booked")
    )
)]
pub async fn update_entry(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEntryRequest>,
) -> AppResult<Json<TimetableEntry>> {
    require_permission(&current_user, PERM_MANAGE_TIMETABLE)?;

    let entry = state
        .services
        .timetable()
        .update_entry(
            id,
            TimetableEntryPatch {
                subject: payload.subject,
                teacher_id: payload.teacher_id,
            },
        )
        .await?;

    state
        .services
        .audit()
        .record(current_user.id, "update", "timetable_entry", Some(id), None)
        .await;

    Ok(Json(entry))
}

/// Delete a timetable entry
#[utoipa::path(
    delete,
    path = "/timetable/{id}",
    tag = "Timetable",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Entry deleted"),
        (status = 404, description = "Entry not found")
    )
)]
pub async fn delete_entry(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    require_permission(&current_user, PERM_MANAGE_TIMETABLE)?;

    state.services.timetable().delete_entry(id).await?;

    state
        .services
        .audit()
        .record(current_user.id, "delete", "timetable_entry", Some(id), None)
        .await;

    Ok(NoContent)
}
