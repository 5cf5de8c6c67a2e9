//! Fee structure and payment handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, Json},
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
use crate::config::PERM_MANAGE_FEES;
use crate::domain::{FeePayment, FeeStructure};
use crate::errors::AppResult;
use crate::infra::{FeeStructurePatch, NewFeeStructure};
use crate::services::PublishOutcome;
use crate::types::NoContent;
use crate::utils::receipt;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStructureRequest {
    #[validate(length(min = 1, message = "Class is required"))]
    #[schema(example = "Grade 7")]
    pub class_name: String,
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Tuition Term 1")]
    pub name: String,
    /// Amount levied per student, minor units
    pub amount: i64,
    #[validate(length(min = 1, message = "Academic year is required"))]
    #[schema(example = "2026/2027")]
    pub academic_year: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStructureRequest {
    pub name: Option<String>,
    pub amount: Option<i64>,
    pub academic_year: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordPaymentRequest {
    pub student_id: Uuid,
    /// Minor units; must not exceed the student's outstanding balance
    pub amount: i64,
    #[schema(example = "cash")]
    pub method: String,
    pub reference: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct StructureListQuery {
    pub class_name: Option<String>,
    pub academic_year: Option<String>,
}

pub fn fee_routes() -> Router<AppState> {
    Router::new()
        .route("/structures", get(list_structures).post(create_structure))
        .route(
            "/structures/:id",
            get(get_structure)
                .put(update_structure)
                .delete(delete_structure),
        )
        .route("/structures/:id/publish", post(publish_structure))
        .route("/structures/:id/revert", post(revert_structure))
        .route("/payments", post(record_payment))
        .route("/payments/student/:student_id", get(student_payments))
        .route("/payments/:id/receipt", get(payment_receipt))
}

/// List fee structures
#[utoipa::path(
    get,
    path = "/fees/structures",
    tag = "Fees",
    security(("bearer_auth" = [])),
    params(StructureListQuery),
    responses(
        (status = 200, description = "Fee structures", body = [FeeStructure])
    )
)]
pub async fn list_structures(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<StructureListQuery>,
) -> AppResult<Json<Vec<FeeStructure>>> {
    require_permission(&current_user, PERM_MANAGE_FEES)?;

    let structures = state
        .services
        .fees()
        .list_structures(query.class_name, query.academic_year)
        .await?;
    Ok(Json(structures))
}

/// Get one fee structure
#[utoipa::path(
    get,
    path = "/fees/structures/{id}",
    tag = "Fees",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Structure found", body = FeeStructure),
        (status = 404, description = "Structure not found")
    )
)]
pub async fn get_structure(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<FeeStructure>> {
    require_permission(&current_user, PERM_MANAGE_FEES)?;

    let structure = state.services.fees().get_structure(id).await?;
    Ok(Json(structure))
}

/// Create a draft fee structure
#[utoipa::path(
    post,
    path = "/fees/structures",
    tag = "Fees",
    security(("bearer_auth" = [])),
    request_body = CreateStructureRequest,
    responses(
        (status = 201, description = "Structure created", body = FeeStructure),
        (status = 400, description = "Invalid amount")
    )
)]
pub async fn create_structure(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateStructureRequest>,
) -> AppResult<(StatusCode, Json<FeeStructure>)> {
    require_permission(&current_user, PERM_MANAGE_FEES)?;

    let structure = state
        .services
        .fees()
        .create_structure(NewFeeStructure {
            class_name: payload.class_name,
            name: payload.name,
            amount: payload.amount,
            academic_year: payload.academic_year,
        })
        .await?;

    state
        .services
        .audit()
        .record(
            current_user.id,
            "create",
            "fee_structure",
            Some(structure.id),
            None,
        )
        .await;

    Ok((StatusCode::CREATED, Json(structure)))
}

/// Update a draft fee structure
#[utoipa::path(
    put,
    path = "/fees/structures/{id}",
    tag = "Fees",
    security(("bearer_auth" = [])),
    request_body = UpdateStructureRequest,
    responses(
        (status = 200, description = "Structure updated", body = FeeStructure),
        (status = 400, description = "Structure is published"),
        (status = 404, description = "Structure not found")
    )
)]
pub async fn update_structure(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStructureRequest>,
) -> AppResult<Json<FeeStructure>> {
    require_permission(&current_user, PERM_MANAGE_FEES)?;

    let structure = state
        .services
        .fees()
        .update_structure(
            id,
            FeeStructurePatch {
                name: payload.name,
                amount: payload.amount,
                academic_year: payload.academic_year,
            },
        )
        .await?;

    state
        .services
        .audit()
        .record(current_user.id, "update", "fee_structure", Some(id), None)
        .await;

    Ok(Json(structure))
}

/// Delete a draft fee structure
#[utoipa::path(
    delete,
    path = "/fees/structures/{id}",
    tag = "Fees",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Structure deleted"),
        (status = 400, description = "Structure is published"),
        (status = 404, description = "Structure not found")
    )
)]
pub async fn delete_structure(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    require_permission(&current_user, PERM_MANAGE_FEES)?;

    state.services.fees().delete_structure(id).await?;

    state
        .services
        .audit()
        .record(current_user.id, "delete", "fee_structure", Some(id), None)
        .await;

    Ok(NoContent)
}

/// Publish a structure, levying it on every active student of the class
#[utoipa::path(
    post,
    path = "/fees/structures/{id}/publish",
    tag = "Fees",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Structure published", body = PublishOutcome),
        (status = 400, description = "Already published"),
        (status = 404, description = "Structure not found")
    )
)]
pub async fn publish_structure(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PublishOutcome>> {
    require_permission(&current_user, PERM_MANAGE_FEES)?;

    let outcome = state.services.fees().publish_structure(id).await?;

    state
        .services
        .audit()
        .record(
            current_user.id,
            "publish",
            "fee_structure",
            Some(id),
            Some(format!("{} students affected", outcome.students_affected)),
        )
        .await;

    Ok(Json(outcome))
}

/// Revert a published structure, withdrawing the levy
#[utoipa::path(
    post,
    path = "/fees/structures/{id}/revert",
    tag = "Fees",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Structure reverted", body = PublishOutcome),
        (status = 400, description = "Not published"),
        (status = 404, description = "Structure not found")
    )
)]
pub async fn revert_structure(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PublishOutcome>> {
    require_permission(&current_user, PERM_MANAGE_FEES)?;

    let outcome = state.services.fees().revert_structure(id).await?;

    state
        .services
        .audit()
        .record(
            current_user.id,
            "revert",
            "fee_structure",
            Some(id),
            Some(format!("{} students affected", outcome.students_affected)),
        )
        .await;

    Ok(Json(outcome))
}

/// Record a fee payment
#[utoipa::path(
    post,
    path = "/fees/payments",
    tag = "Fees",
    security(("bearer_auth" = [])),
    request_body = RecordPaymentRequest,
    responses(
        (status = 201, description = "Payment recorded", body = FeePayment),
        (status = 400, description = "Invalid amount, method, or overpayment"),
        (status = 404, description = "Student not found")
    )
)]
pub async fn record_payment(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<RecordPaymentRequest>,
) -> AppResult<(StatusCode, Json<FeePayment>)> {
    require_permission(&current_user, PERM_MANAGE_FEES)?;

    let payment = state
        .services
        .fees()
        .record_payment(
            payload.student_id,
            payload.amount,
            payload.method,
            payload.reference,
            payload.note,
            current_user.id,
        )
        .await?;

    state
        .services
        .audit()
        .record(
            current_user.id,
            "create",
            "fee_payment",
            Some(payment.id),
            Some(format!("amount {}", payment.amount)),
        )
        .await;

    Ok((StatusCode::CREATED, Json(payment)))
}

/// All payments for one student
#[utoipa::path(
    get,
    path = "/fees/payments/student/{student_id}",
    tag = "Fees",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Payments", body = [FeePayment]),
        (status = 404, description = "Student not found")
    )
)]
pub async fn student_payments(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(student_id): Path<Uuid>,
) -> AppResult<Json<Vec<FeePayment>>> {
    require_permission(&current_user, PERM_MANAGE_FEES)?;

    let payments = state
        .services
        .fees()
        .payments_for_student(student_id)
        .await?;
    Ok(Json(payments))
}

/// Printable HTML receipt for one payment
#[utoipa::path(
    get,
    path = "/fees/payments/{id}/receipt",
    tag = "Fees",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Receipt page", content_type = "text/html"),
        (status = 404, description = "Payment not found")
    )
)]
pub async fn payment_receipt(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Html<String>> {
    require_permission(&current_user, PERM_MANAGE_FEES)?;

    let data = state.services.fees().receipt(id).await?;
    Ok(Html(receipt::render(&data)))
}
