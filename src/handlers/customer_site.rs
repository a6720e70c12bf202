//! Customer-facing board pages and the unread-like endpoints.
//!
//! The share-handle pages carry no authentication; possession of the handle
//! is the credential. Opening a page acknowledges every open like on that
//! board and writes the cached counter back to zero, which is what clears the
//! badge in the staff list view.

use axum::extract::{Path, Query, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::StaffSession;
use crate::error::{owner_gone, ApiError, RepositoryError};
use crate::models::customer::Model as CustomerModel;
use crate::repositories::board::{BoardEntry, BoardFilter};
use crate::repositories::{BoardKind, BoardRepository, CustomerRepository};
use crate::server::AppState;

/// Customer header shown on the shared page. Deliberately narrower than the
/// staff view; the page is for the customer, not about them.
#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerHeader {
    pub customer_name: String,
    pub move_in_date: Option<String>,
    pub employee_name: String,
}

impl From<CustomerModel> for CustomerHeader {
    fn from(model: CustomerModel) -> Self {
        Self {
            customer_name: model.customer_name,
            move_in_date: model.move_in_date,
            employee_name: model.employee_name,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerPageResponse {
    pub success: bool,
    pub customer: CustomerHeader,
    pub links: Vec<BoardEntry>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MarkCheckedBody {
    #[schema(example = "a1b2c3d4")]
    pub management_site_id: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UncheckedQuery {
    pub management_site_id: String,
    /// `residence` or `business`
    #[serde(rename = "type")]
    pub board_type: String,
}

fn board_type(raw: &str) -> Result<BoardKind, ApiError> {
    match raw {
        "residence" => Ok(BoardKind::Residential),
        "business" => Ok(BoardKind::Commercial),
        _ => Err(RepositoryError::validation_error("type must be 'residence' or 'business'").into()),
    }
}

/// Open a customer board page: resolve the handle, acknowledge open likes,
/// reconcile the cached counter, and return the entries.
async fn open_customer_page(
    state: AppState,
    kind: BoardKind,
    management_site_id: String,
) -> Result<Json<CustomerPageResponse>, ApiError> {
    let customers = CustomerRepository::new(&state.db);
    let customer = customers
        .find_by_handle(&management_site_id)
        .await?
        .ok_or_else(|| owner_gone(&management_site_id))?;

    let board = BoardRepository::new(&state.db, kind);
    let acknowledged = board.acknowledge(&management_site_id).await?;
    customers
        .set_unchecked_cache(&management_site_id, kind, 0)
        .await?;
    if acknowledged > 0 {
        tracing::debug!(%management_site_id, acknowledged, "likes acknowledged on page open");
    }

    let links = board
        .list(&BoardFilter {
            management_site_id: Some(management_site_id),
            ..Default::default()
        })
        .await?;

    Ok(Json(CustomerPageResponse {
        success: true,
        customer: customer.into(),
        links,
    }))
}

/// Acknowledge open likes without rendering the page.
async fn mark_checked(
    state: AppState,
    kind: BoardKind,
    management_site_id: String,
) -> Result<Json<serde_json::Value>, ApiError> {
    let customers = CustomerRepository::new(&state.db);
    customers
        .find_by_handle(&management_site_id)
        .await?
        .ok_or_else(|| owner_gone(&management_site_id))?;

    let updated = BoardRepository::new(&state.db, kind)
        .acknowledge(&management_site_id)
        .await?;
    customers
        .set_unchecked_cache(&management_site_id, kind, 0)
        .await?;

    Ok(Json(serde_json::json!({ "success": true, "updated": updated })))
}

/// Customer's residential board page
#[utoipa::path(
    get,
    path = "/customer/{management_site_id}",
    params(("management_site_id" = String, Path, description = "Customer share handle")),
    responses(
        (status = 200, description = "Customer header and board entries", body = CustomerPageResponse),
        (status = 404, description = "Owner gone", body = ApiError)
    ),
    tag = "customer-site"
)]
pub async fn residential_page(
    State(state): State<AppState>,
    Path(management_site_id): Path<String>,
) -> Result<Json<CustomerPageResponse>, ApiError> {
    open_customer_page(state, BoardKind::Residential, management_site_id).await
}

/// Customer's commercial board page
#[utoipa::path(
    get,
    path = "/business/customer/{management_site_id}",
    params(("management_site_id" = String, Path, description = "Customer share handle")),
    responses(
        (status = 200, description = "Customer header and board entries", body = CustomerPageResponse),
        (status = 404, description = "Owner gone", body = ApiError)
    ),
    tag = "customer-site"
)]
pub async fn commercial_page(
    State(state): State<AppState>,
    Path(management_site_id): Path<String>,
) -> Result<Json<CustomerPageResponse>, ApiError> {
    open_customer_page(state, BoardKind::Commercial, management_site_id).await
}

/// Acknowledge open likes on the residential board
#[utoipa::path(
    post,
    path = "/api/mark-residence-likes-checked",
    request_body = MarkCheckedBody,
    responses(
        (status = 200, description = "Likes acknowledged"),
        (status = 401, description = "Not authenticated", body = ApiError),
        (status = 404, description = "Owner gone", body = ApiError)
    ),
    tag = "customer-site"
)]
pub async fn mark_residence_checked(
    State(state): State<AppState>,
    StaffSession(_session): StaffSession,
    Json(body): Json<MarkCheckedBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    mark_checked(state, BoardKind::Residential, body.management_site_id).await
}

/// Acknowledge open likes on the commercial board
#[utoipa::path(
    post,
    path = "/api/mark-business-likes-checked",
    request_body = MarkCheckedBody,
    responses(
        (status = 200, description = "Likes acknowledged"),
        (status = 401, description = "Not authenticated", body = ApiError),
        (status = 404, description = "Owner gone", body = ApiError)
    ),
    tag = "customer-site"
)]
pub async fn mark_business_checked(
    State(state): State<AppState>,
    StaffSession(_session): StaffSession,
    Json(body): Json<MarkCheckedBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    mark_checked(state, BoardKind::Commercial, body.management_site_id).await
}

/// Live unread-like count for one customer board
///
/// Recomputed from the board rows; the cached column is never consulted.
#[utoipa::path(
    get,
    path = "/api/employee/unchecked-likes",
    params(
        ("management_site_id" = String, Query, description = "Customer share handle"),
        ("type" = String, Query, description = "residence or business")
    ),
    responses(
        (status = 200, description = "Unread count"),
        (status = 400, description = "Unknown board type", body = ApiError),
        (status = 401, description = "Not authenticated", body = ApiError)
    ),
    tag = "customer-site"
)]
pub async fn unchecked_likes(
    State(state): State<AppState>,
    StaffSession(_session): StaffSession,
    Query(query): Query<UncheckedQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let kind = board_type(&query.board_type)?;
    let count = BoardRepository::new(&state.db, kind)
        .unchecked_count(&query.management_site_id)
        .await?;

    Ok(Json(serde_json::json!({ "success": true, "count": count })))
}
