//! Guarantee-insurance catalogue endpoints.
//!
//! The catalogue is the set of residential entries flagged as carrying
//! guarantee insurance, limited to the recent listing window. Click logging
//! is open to anonymous customers; curation is staff and admin territory.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{AdminSession, MaybeStaff, StaffSession};
use crate::error::ApiError;
use crate::repositories::board::BoardEntry;
use crate::repositories::GuaranteeCatalog;
use crate::server::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct GuaranteeResetBody {
    #[schema(example = "김영희")]
    pub employee_name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GuaranteeLogBody {
    pub link_id: i32,
    pub management_site_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GuaranteeListResponse {
    pub success: bool,
    pub links: Vec<BoardEntry>,
}

/// Client IP as reported by the reverse proxy, if any.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers.get("x-forwarded-for")?.to_str().ok()?;
    let first = forwarded.split(',').next()?.trim();
    (!first.is_empty()).then(|| first.to_string())
}

/// List the guarantee-insurance catalogue
///
/// Residential entries flagged within the listing window, newest first.
#[utoipa::path(
    get,
    path = "/api/guarantee-list",
    responses(
        (status = 200, description = "Catalogue entries", body = GuaranteeListResponse),
        (status = 401, description = "Not authenticated", body = ApiError)
    ),
    tag = "guarantee"
)]
pub async fn guarantee_list(
    State(state): State<AppState>,
    StaffSession(_session): StaffSession,
) -> Result<Json<GuaranteeListResponse>, ApiError> {
    let catalog = GuaranteeCatalog::new(&state.db, state.config.guarantee_expiry_days);
    let links = catalog.list_catalogue().await?;

    Ok(Json(GuaranteeListResponse {
        success: true,
        links,
    }))
}

/// Record a guarantee-insurance click and flag the entry
///
/// Open to anonymous customers; the click log keeps the handle and the
/// caller's forwarded IP when available.
#[utoipa::path(
    post,
    path = "/api/guarantee-log",
    request_body = GuaranteeLogBody,
    responses(
        (status = 200, description = "Click recorded"),
        (status = 404, description = "Entry not found", body = ApiError)
    ),
    tag = "guarantee"
)]
pub async fn guarantee_log(
    State(state): State<AppState>,
    MaybeStaff(_staff): MaybeStaff,
    headers: HeaderMap,
    Json(body): Json<GuaranteeLogBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let catalog = GuaranteeCatalog::new(&state.db, state.config.guarantee_expiry_days);
    let log = catalog
        .log_click(body.link_id, body.management_site_id, client_ip(&headers))
        .await?;

    Ok(Json(serde_json::json!({ "success": true, "log_id": log.id })))
}

/// Demote every catalogue entry added by one staff member
#[utoipa::path(
    post,
    path = "/api/guarantee-insurance-reset",
    request_body = GuaranteeResetBody,
    responses(
        (status = 200, description = "Entries demoted"),
        (status = 403, description = "Administrator access required", body = ApiError)
    ),
    tag = "guarantee"
)]
pub async fn guarantee_reset(
    State(state): State<AppState>,
    AdminSession(_session): AdminSession,
    Json(body): Json<GuaranteeResetBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let catalog = GuaranteeCatalog::new(&state.db, state.config.guarantee_expiry_days);
    let affected = catalog.reset_by_employee(&body.employee_name).await?;
    tracing::info!(employee = %body.employee_name, affected, "guarantee flags reset");

    Ok(Json(
        serde_json::json!({ "success": true, "affected": affected }),
    ))
}

/// Click-log report, newest first
#[utoipa::path(
    get,
    path = "/admin/guarantee-log",
    responses(
        (status = 200, description = "Click log rows"),
        (status = 403, description = "Administrator access required", body = ApiError)
    ),
    tag = "guarantee"
)]
pub async fn guarantee_click_log(
    State(state): State<AppState>,
    AdminSession(_session): AdminSession,
) -> Result<Json<serde_json::Value>, ApiError> {
    let catalog = GuaranteeCatalog::new(&state.db, state.config.guarantee_expiry_days);
    let logs = catalog.click_log().await?;

    Ok(Json(serde_json::json!({ "success": true, "logs": logs })))
}

/// Remove one entry from the catalogue
///
/// Demotes the flag only; the board entry itself survives.
#[utoipa::path(
    post,
    path = "/admin/guarantee-delete/{id}",
    params(("id" = i32, Path, description = "Board entry id")),
    responses(
        (status = 200, description = "Entry demoted"),
        (status = 403, description = "Administrator access required", body = ApiError),
        (status = 404, description = "Entry not found", body = ApiError)
    ),
    tag = "guarantee"
)]
pub async fn guarantee_delete(
    State(state): State<AppState>,
    AdminSession(_session): AdminSession,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let catalog = GuaranteeCatalog::new(&state.db, state.config.guarantee_expiry_days);
    catalog.remove_from_catalogue(id).await?;

    Ok(Json(serde_json::json!({ "success": true })))
}
