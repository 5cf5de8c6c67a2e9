//! School settings handlers.

use axum::{extract::State, response::Json, routing::get, Extension, Router};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::middleware::{require_permission, CurrentUser};
use crate::api::AppState;
use crate::config::PERM_MANAGE_SETTINGS;
use crate::domain::SchoolSettings;
use crate::errors::AppResult;
use crate::infra::SettingsPatch;

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateSettingsRequest {
    pub school_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    #[schema(example = "2026/2027")]
    pub academic_year: Option<String>,
    #[schema(example = "USD")]
    pub currency: Option<String>,
}

pub fn settings_routes() -> Router<AppState> {
    Router::new().route("/", get(get_settings).put(update_settings))
}

/// Current school settings
#[utoipa::path(
    get,
    path = "/settings",
    tag = "Settings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Settings", body = SchoolSettings),
        (status = 404, description = "Settings not yet configured")
    )
)]
pub async fn get_settings(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<SchoolSettings>> {
    require_permission(&current_user, PERM_MANAGE_SETTINGS)?;

    let settings = state.services.settings().get_settings().await?;
    Ok(Json(settings))
}

/// Update school settings, creating them on first write
#[utoipa::path(
    put,
    path = "/settings",
    tag = "Settings",
    security(("bearer_auth" = [])),
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Settings updated", body = SchoolSettings),
        (status = 400, description = "Empty school name")
    )
)]
pub async fn update_settings(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<UpdateSettingsRequest>,
) -> AppResult<Json<SchoolSettings>> {
    require_permission(&current_user, PERM_MANAGE_SETTINGS)?;

    let settings = state
        .services
        .settings()
        .update_settings(SettingsPatch {
            school_name: payload.school_name,
            address: payload.address,
            phone: payload.phone,
            email: payload.email,
            academic_year: payload.academic_year,
            currency: payload.currency,
        })
        .await?;

    state
        .services
        .audit()
        .record(current_user.id, "update", "settings", None, None)
        .await;

    Ok(Json(settings))
}
