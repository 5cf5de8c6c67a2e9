//! Attendance handlers.

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
use crate::config::PERM_RECORD_ATTENDANCE;
use crate::domain::{AttendanceRecord, AttendanceStatus, AttendanceSummary};
use crate::errors::AppResult;
use crate::infra::AttendanceFilter;

#[derive(Debug, Deserialize, ToSchema)]
pub struct MarkAttendanceRequest {
    pub student_id: Uuid,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BulkMark {
    pub student_id: Uuid,
    pub status: AttendanceStatus,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BulkMarkRequest {
    pub date: NaiveDate,
    #[validate(length(min = 1, message = "At least one mark is required"))]
    pub marks: Vec<BulkMark>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AttendanceListQuery {
    pub student_id: Option<Uuid>,
    pub class_name: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SummaryQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Summary counts plus the derived rate
#[derive(Debug, Serialize, ToSchema)]
pub struct SummaryResponse {
    pub student_id: Uuid,
    pub present: u64,
    pub absent: u64,
    pub late: u64,
    pub excused: u64,
    pub total: u64,
    pub rate_percent: f64,
}

impl From<AttendanceSummary> for SummaryResponse {
    fn from(s: AttendanceSummary) -> Self {
        Self {
            student_id: s.student_id,
            total: s.total(),
            rate_percent: s.rate_percent(),
            present: s.present,
            absent: s.absent,
            late: s.late,
            excused: s.excused,
        }
    }
}

pub fn attendance_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_attendance).post(mark_attendance))
        .route("/bulk", post(mark_attendance_bulk))
        .route("/summary/:student_id", get(attendance_summary))
}

/// List attendance records
#[utoipa::path(
    get,
    path = "/attendance",
    tag = "Attendance",
    security(("bearer_auth" = [])),
    params(AttendanceListQuery),
    responses(
        (status = 200, description = "Matching records", body = [AttendanceRecord])
    )
)]
pub async fn list_attendance(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<AttendanceListQuery>,
) -> AppResult<Json<Vec<AttendanceRecord>>> {
    require_permission(&current_user, PERM_RECORD_ATTENDANCE)?;

    let records = state
        .services
        .attendance()
        .list(AttendanceFilter {
            student_id: query.student_id,
            class_name: query.class_name,
            from: query.from,
            to: query.to,
        })
        .await?;

    Ok(Json(records))
}

/// Mark one student for one date
#[utoipa::path(
    post,
    path = "/attendance",
    tag = "Attendance",
    security(("bearer_auth" = [])),
    request_body = MarkAttendanceRequest,
    responses(
        (status = 201, description = "Attendance recorded", body = AttendanceRecord),
        (status = 400, description = "Student is not active"),
        (status = 404, description = "Student not found")
    )
)]
pub async fn mark_attendance(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<MarkAttendanceRequest>,
) -> AppResult<(StatusCode, Json<AttendanceRecord>)> {
    require_permission(&current_user, PERM_RECORD_ATTENDANCE)?;

    let record = state
        .services
        .attendance()
        .mark(payload.student_id, payload.date, payload.status, current_user.id)
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// Mark a whole class in one request.
///
/// Marks are written in order and the call stops at the first bad
/// entry; marks recorded before it stay recorded. Re-submitting the
/// corrected sheet is safe since a mark per (student, date) is an
/// upsert.
#[utoipa::path(
    post,
    path = "/attendance/bulk",
    tag = "Attendance",
    security(("bearer_auth" = [])),
    request_body = BulkMarkRequest,
    responses(
        (status = 201, description = "Attendance recorded", body = [AttendanceRecord]),
        (status = 400, description = "Empty mark list or inactive student; marks before the failing entry stay recorded")
    )
)]
pub async fn mark_attendance_bulk(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<BulkMarkRequest>,
) -> AppResult<(StatusCode, Json<Vec<AttendanceRecord>>)> {
    require_permission(&current_user, PERM_RECORD_ATTENDANCE)?;

    let marks = payload
        .marks
        .into_iter()
        .map(|m| (m.student_id, m.status))
        .collect();

    let records = state
        .services
        .attendance()
        .mark_bulk(payload.date, marks, current_user.id)
        .await?;

    Ok((StatusCode::CREATED, Json(records)))
}

/// Attendance summary for one student over a date range
#[utoipa::path(
    get,
    path = "/attendance/summary/{student_id}",
    tag = "Attendance",
    security(("bearer_auth" = [])),
    params(SummaryQuery),
    responses(
        (status = 200, description = "Summary counts", body = SummaryResponse),
        (status = 404, description = "Student not found")
    )
)]
pub async fn attendance_summary(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(student_id): Path<Uuid>,
    Query(query): Query<SummaryQuery>,
) -> AppResult<Json<SummaryResponse>> {
    require_permission(&current_user, PERM_RECORD_ATTENDANCE)?;

    let summary = state
        .services
        .attendance()
        .summary(student_id, query.from, query.to)
        .await?;

    Ok(Json(SummaryResponse::from(summary)))
}
