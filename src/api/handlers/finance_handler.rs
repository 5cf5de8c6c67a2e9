//! Finance handlers: ledger, expenses and payroll.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
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
use crate::config::PERM_MANAGE_FINANCE;
use crate::domain::{
    Account, AccountKind, ExpenseRequest, ExpenseStatus, LedgerTransaction, PayrollEntry,
    TransactionLine,
};
use crate::errors::AppResult;
use crate::infra::{NewAccount, NewExpense};
use crate::services::PayrollRunSummary;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAccountRequest {
    #[validate(length(min = 1, message = "Code is required"))]
    #[schema(example = "1010")]
    pub code: String,
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Cash on hand")]
    pub name: String,
    pub kind: AccountKind,
    /// Minor units
    #[serde(default)]
    pub opening_balance: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PostTransactionRequest {
    #[validate(length(min = 2, message = "A transaction needs at least two lines"))]
    pub lines: Vec<TransactionLine>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateExpenseRequest {
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    /// Minor units
    pub amount: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DecideExpenseRequest {
    pub approve: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GeneratePayrollRequest {
    #[validate(length(min = 7, max = 7, message = "period must be formatted YYYY-MM"))]
    #[schema(example = "2026-08")]
    pub period: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct TransactionListQuery {
    pub account_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ExpenseListQuery {
    pub status: Option<ExpenseStatus>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PayrollListQuery {
    pub period: Option<String>,
}

pub fn finance_routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts).post(create_account))
        .route("/accounts/:id", get(get_account))
        .route("/accounts/:id/ledger", get(account_ledger))
        .route("/transactions", get(list_transactions).post(post_transaction))
        .route("/expenses", get(list_expenses).post(create_expense))
        .route("/expenses/:id/decide", post(decide_expense))
        .route("/payroll", get(list_payroll).post(generate_payroll))
        .route("/payroll/:id/pay", post(mark_payroll_paid))
}

/// Chart of accounts
#[utoipa::path(
    get,
    path = "/finance/accounts",
    tag = "Finance",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Accounts", body = [Account])
    )
)]
pub async fn list_accounts(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Account>>> {
    require_permission(&current_user, PERM_MANAGE_FINANCE)?;

    let accounts = state.services.finance().list_accounts().await?;
    Ok(Json(accounts))
}

/// Get one ledger account
#[utoipa::path(
    get,
    path = "/finance/accounts/{id}",
    tag = "Finance",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Account found", body = Account),
        (status = 404, description = "Account not found")
    )
)]
pub async fn get_account(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Account>> {
    require_permission(&current_user, PERM_MANAGE_FINANCE)?;

    let account = state.services.finance().get_account(id).await?;
    Ok(Json(account))
}

/// Create a ledger account
#[utoipa::path(
    post,
    path = "/finance/accounts",
    tag = "Finance",
    security(("bearer_auth" = [])),
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = Account),
        (status = 409, description = "Account code already exists")
    )
)]
pub async fn create_account(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateAccountRequest>,
) -> AppResult<(StatusCode, Json<Account>)> {
    require_permission(&current_user, PERM_MANAGE_FINANCE)?;

    let account = state
        .services
        .finance()
        .create_account(NewAccount {
            code: payload.code,
            name: payload.name,
            kind: payload.kind,
            opening_balance: payload.opening_balance,
        })
        .await?;

    state
        .services
        .audit()
        .record(current_user.id, "create", "account", Some(account.id), None)
        .await;

    Ok((StatusCode::CREATED, Json(account)))
}

/// Post a balanced double-entry transaction
#[utoipa::path(
    post,
    path = "/finance/transactions",
    tag = "Finance",
    security(("bearer_auth" = [])),
    request_body = PostTransactionRequest,
    responses(
        (status = 201, description = "Posting committed", body = LedgerTransaction),
        (status = 400, description = "Unbalanced or malformed lines")
    )
)]
pub async fn post_transaction(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<PostTransactionRequest>,
) -> AppResult<(StatusCode, Json<LedgerTransaction>)> {
    require_permission(&current_user, PERM_MANAGE_FINANCE)?;

    let transaction = state
        .services
        .finance()
        .post_transaction(payload.lines, current_user.id)
        .await?;

    state
        .services
        .audit()
        .record(
            current_user.id,
            "post",
            "ledger_transaction",
            Some(transaction.transaction_id),
            Some(format!("total {}", transaction.total_debit)),
        )
        .await;

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// Journal grouped into transactions, optionally per account
#[utoipa::path(
    get,
    path = "/finance/transactions",
    tag = "Finance",
    security(("bearer_auth" = [])),
    params(TransactionListQuery),
    responses(
        (status = 200, description = "Transactions", body = [LedgerTransaction])
    )
)]
pub async fn list_transactions(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<TransactionListQuery>,
) -> AppResult<Json<Vec<LedgerTransaction>>> {
    require_permission(&current_user, PERM_MANAGE_FINANCE)?;

    let transactions = state
        .services
        .finance()
        .list_transactions(query.account_id)
        .await?;
    Ok(Json(transactions))
}

/// Ledger for one account: the transactions that touched it
#[utoipa::path(
    get,
    path = "/finance/accounts/{id}/ledger",
    tag = "Finance",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Account ledger", body = [LedgerTransaction]),
        (status = 404, description = "Account not found")
    )
)]
pub async fn account_ledger(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<LedgerTransaction>>> {
    require_permission(&current_user, PERM_MANAGE_FINANCE)?;

    // 404 for unknown accounts rather than an empty ledger
    state.services.finance().get_account(id).await?;
    let transactions = state.services.finance().list_transactions(Some(id)).await?;
    Ok(Json(transactions))
}

/// File an expense request
#[utoipa::path(
    post,
    path = "/finance/expenses",
    tag = "Finance",
    security(("bearer_auth" = [])),
    request_body = CreateExpenseRequest,
    responses(
        (status = 201, description = "Expense request created", body = ExpenseRequest),
        (status = 400, description = "Invalid amount")
    )
)]
pub async fn create_expense(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateExpenseRequest>,
) -> AppResult<(StatusCode, Json<ExpenseRequest>)> {
    require_permission(&current_user, PERM_MANAGE_FINANCE)?;

    let expense = state
        .services
        .finance()
        .create_expense(NewExpense {
            requested_by: current_user.id,
            description: payload.description,
            amount: payload.amount,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(expense)))
}

/// List expense requests
#[utoipa::path(
    get,
    path = "/finance/expenses",
    tag = "Finance",
    security(("bearer_auth" = [])),
    params(ExpenseListQuery),
    responses(
        (status = 200, description = "Expense requests", body = [ExpenseRequest])
    )
)]
pub async fn list_expenses(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<ExpenseListQuery>,
) -> AppResult<Json<Vec<ExpenseRequest>>> {
    require_permission(&current_user, PERM_MANAGE_FINANCE)?;

    let expenses = state.services.finance().list_expenses(query.status).await?;
    Ok(Json(expenses))
}

/// Approve or reject a pending expense request
#[utoipa::path(
    post,
    path = "/finance/expenses/{id}/decide",
    tag = "Finance",
    security(("bearer_auth" = [])),
    request_body = DecideExpenseRequest,
    responses(
        (status = 200, description = "Expense decided", body = ExpenseRequest),
        (status = 400, description = "Already decided"),
        (status = 404, description = "Expense not found")
    )
)]
pub async fn decide_expense(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DecideExpenseRequest>,
) -> AppResult<Json<ExpenseRequest>> {
    require_permission(&current_user, PERM_MANAGE_FINANCE)?;

    let expense = state
        .services
        .finance()
        .decide_expense(id, payload.approve, current_user.id)
        .await?;

    state
        .services
        .audit()
        .record(
            current_user.id,
            if payload.approve { "approve" } else { "reject" },
            "expense",
            Some(id),
            None,
        )
        .await;

    Ok(Json(expense))
}

/// Generate pending payroll for all active teachers
#[utoipa::path(
    post,
    path = "/finance/payroll",
    tag = "Finance",
    security(("bearer_auth" = [])),
    request_body = GeneratePayrollRequest,
    responses(
        (status = 201, description = "Payroll run summary", body = PayrollRunSummary),
        (status = 400, description = "Bad period format")
    )
)]
pub async fn generate_payroll(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<GeneratePayrollRequest>,
) -> AppResult<(StatusCode, Json<PayrollRunSummary>)> {
    require_permission(&current_user, PERM_MANAGE_FINANCE)?;

    let summary = state
        .services
        .finance()
        .generate_payroll(payload.period)
        .await?;

    state
        .services
        .audit()
        .record(
            current_user.id,
            "generate",
            "payroll",
            None,
            Some(format!(
                "{}: created {}, skipped {}",
                summary.period, summary.created, summary.skipped
            )),
        )
        .await;

    Ok((StatusCode::CREATED, Json(summary)))
}

/// List payroll entries, optionally for one period
#[utoipa::path(
    get,
    path = "/finance/payroll",
    tag = "Finance",
    security(("bearer_auth" = [])),
    params(PayrollListQuery),
    responses(
        (status = 200, description = "Payroll entries", body = [PayrollEntry])
    )
)]
pub async fn list_payroll(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<PayrollListQuery>,
) -> AppResult<Json<Vec<PayrollEntry>>> {
    require_permission(&current_user, PERM_MANAGE_FINANCE)?;

    let entries = state.services.finance().list_payroll(query.period).await?;
    Ok(Json(entries))
}

/// Mark a payroll entry paid
#[utoipa::path(
    post,
    path = "/finance/payroll/{id}/pay",
    tag = "Finance",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Entry marked paid", body = PayrollEntry),
        (status = 400, description = "Already paid"),
        (status = 404, description = "Entry not found")
    )
)]
pub async fn mark_payroll_paid(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PayrollEntry>> {
    require_permission(&current_user, PERM_MANAGE_FINANCE)?;

    let entry = state.services.finance().mark_payroll_paid(id).await?;

    state
        .services
        .audit()
        .record(current_user.id, "pay", "payroll", Some(id), None)
        .await;

    Ok(Json(entry))
}
