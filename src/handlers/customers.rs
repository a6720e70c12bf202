//! Customer CRUD endpoints.
//!
//! Listings are scoped by role: administrators see every record, team leaders
//! their team, plain employees their own. The unread-like counters in list
//! responses are recomputed from the board rows on every request, never read
//! from the cached columns.

use axum::extract::{Path, Query, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::StaffSession;
use crate::error::{forbidden, ApiError, RepositoryError};
use crate::models::customer::Model as CustomerModel;
use crate::repositories::customer::{CreateCustomerRequest, CustomerScope};
use crate::repositories::{BoardKind, BoardRepository, CustomerRepository};
use crate::server::AppState;
use crate::session::Session;

/// Customer record as returned by the API. The unread counts are live values,
/// not the cached columns.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CustomerView {
    pub id: i32,
    /// Share handle for the customer's board pages
    #[schema(example = "a1b2c3d4")]
    pub management_site_id: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub inquiry_date: Option<String>,
    pub move_in_date: Option<String>,
    pub budget: Option<i64>,
    pub rooms: Option<String>,
    pub location: Option<String>,
    pub loan_needed: Option<String>,
    pub parking_needed: Option<String>,
    pub pets: Option<String>,
    pub memo: Option<String>,
    #[schema(example = "진행중")]
    pub progress_status: String,
    pub employee_id: i32,
    pub employee_name: String,
    pub employee_team: String,
    pub created_date: String,
    pub updated_date: Option<String>,
    pub unchecked_likes_residence: u64,
    pub unchecked_likes_business: u64,
}

impl CustomerView {
    fn new(model: CustomerModel, residence: u64, business: u64) -> Self {
        Self {
            id: model.id,
            management_site_id: model.management_site_id,
            customer_name: model.customer_name,
            customer_phone: model.customer_phone,
            inquiry_date: model.inquiry_date,
            move_in_date: model.move_in_date,
            budget: model.budget,
            rooms: model.rooms,
            location: model.location,
            loan_needed: model.loan_needed,
            parking_needed: model.parking_needed,
            pets: model.pets,
            memo: model.memo,
            progress_status: model.progress_status,
            employee_id: model.employee_id,
            employee_name: model.employee_name,
            employee_team: model.employee_team,
            created_date: model.created_date.to_rfc3339(),
            updated_date: model.updated_date.map(|d| d.to_rfc3339()),
            unchecked_likes_residence: residence,
            unchecked_likes_business: business,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListCustomersQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    /// Admin only: list every employee's customers regardless of team
    #[serde(default)]
    pub all_employees: bool,
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    20
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerListResponse {
    pub success: bool,
    pub customers: Vec<CustomerView>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCustomerBody {
    #[schema(example = "홍길동")]
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub inquiry_date: Option<String>,
    pub move_in_date: Option<String>,
    /// Budget as entered on the intake form; numbers and decorated text
    /// such as `5,000만원` are both accepted
    pub budget: Option<serde_json::Value>,
    pub rooms: Option<String>,
    pub location: Option<String>,
    pub loan_needed: Option<String>,
    pub parking_needed: Option<String>,
    pub pets: Option<String>,
    pub memo: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerResponse {
    pub success: bool,
    pub id: i32,
    pub customer: CustomerView,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FieldUpdateBody {
    #[schema(example = "move_in_date")]
    pub field: String,
    pub value: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MemoUpdateBody {
    pub memo: Option<String>,
}

fn scope_for(session: &Session, all_employees: bool) -> CustomerScope {
    if session.is_admin() {
        return CustomerScope::All;
    }
    if session.is_team_leader() {
        return CustomerScope::Team(session.team.clone());
    }
    if all_employees {
        // Plain employees never widen their scope.
        tracing::debug!(name = %session.name, "all_employees ignored for non-admin");
    }
    CustomerScope::Owner(session.employee_id.unwrap_or_default())
}

/// Whether this session may modify or delete the given customer.
fn ensure_customer_access(session: &Session, customer: &CustomerModel) -> Result<(), ApiError> {
    if session.is_admin() {
        return Ok(());
    }
    if session.is_team_leader() && customer.employee_team == session.team {
        return Ok(());
    }
    if session.employee_id == Some(customer.employee_id) {
        return Ok(());
    }
    Err(forbidden(Some("Not your customer")))
}

/// Stringify a JSON value the way form clients submit it. Null becomes None.
fn stringify(value: Option<serde_json::Value>) -> Option<String> {
    match value? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

async fn view_with_live_counts(
    state: &AppState,
    model: CustomerModel,
) -> Result<CustomerView, ApiError> {
    let handle = model.management_site_id.clone();
    let residence = BoardRepository::new(&state.db, BoardKind::Residential)
        .unchecked_count(&handle)
        .await?;
    let business = BoardRepository::new(&state.db, BoardKind::Commercial)
        .unchecked_count(&handle)
        .await?;

    Ok(CustomerView::new(model, residence, business))
}

/// List customers visible to the caller
#[utoipa::path(
    get,
    path = "/api/customers",
    params(
        ("page" = Option<u64>, Query, description = "1-based page number"),
        ("per_page" = Option<u64>, Query, description = "Page size"),
        ("all_employees" = Option<bool>, Query, description = "Admin only: ignore team scoping")
    ),
    responses(
        (status = 200, description = "Scoped customer list", body = CustomerListResponse),
        (status = 401, description = "Not authenticated", body = ApiError)
    ),
    tag = "customers"
)]
pub async fn list_customers(
    State(state): State<AppState>,
    StaffSession(session): StaffSession,
    Query(query): Query<ListCustomersQuery>,
) -> Result<Json<CustomerListResponse>, ApiError> {
    let repo = CustomerRepository::new(&state.db);
    let scope = scope_for(&session, query.all_employees);
    let per_page = query.per_page.clamp(1, 100);

    let (rows, total) = repo.list_customers(&scope, query.page, per_page).await?;

    let mut customers = Vec::with_capacity(rows.len());
    for row in rows {
        customers.push(view_with_live_counts(&state, row).await?);
    }

    Ok(Json(CustomerListResponse {
        success: true,
        customers,
        total,
        page: query.page,
        per_page,
    }))
}

/// Register a new customer
///
/// Mints the share handle and sets up both of the customer's boards.
#[utoipa::path(
    post,
    path = "/api/customers",
    request_body = CreateCustomerBody,
    responses(
        (status = 201, description = "Customer created", body = CustomerResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Not authenticated", body = ApiError)
    ),
    tag = "customers"
)]
pub async fn create_customer(
    State(state): State<AppState>,
    StaffSession(session): StaffSession,
    Json(body): Json<CreateCustomerBody>,
) -> Result<(axum::http::StatusCode, Json<CustomerResponse>), ApiError> {
    let employee_id = session
        .employee_id
        .ok_or_else(|| RepositoryError::validation_error("Administrators do not own customers"))?;

    let repo = CustomerRepository::new(&state.db);
    let request = CreateCustomerRequest {
        customer_name: body.customer_name,
        customer_phone: body.customer_phone,
        inquiry_date: body.inquiry_date,
        move_in_date: body.move_in_date,
        budget: stringify(body.budget),
        rooms: body.rooms,
        location: body.location,
        loan_needed: body.loan_needed,
        parking_needed: body.parking_needed,
        pets: body.pets,
        memo: body.memo,
    };

    let created = repo
        .create_customer(request, employee_id, &session.name, &session.team)
        .await?;

    tracing::info!(customer_id = created.id, "customer created");

    let id = created.id;
    let view = view_with_live_counts(&state, created).await?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(CustomerResponse {
            success: true,
            id,
            customer: view,
        }),
    ))
}

/// Update several customer fields at once
#[utoipa::path(
    put,
    path = "/api/customers/{id}",
    params(("id" = i32, Path, description = "Customer id")),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Customer updated", body = CustomerResponse),
        (status = 400, description = "Unknown field", body = ApiError),
        (status = 403, description = "Not your customer", body = ApiError),
        (status = 404, description = "Customer not found", body = ApiError)
    ),
    tag = "customers"
)]
pub async fn update_customer(
    State(state): State<AppState>,
    StaffSession(session): StaffSession,
    Path(id): Path<i32>,
    Json(body): Json<serde_json::Map<String, serde_json::Value>>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let repo = CustomerRepository::new(&state.db);
    let customer = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| RepositoryError::not_found("Customer"))?;
    ensure_customer_access(&session, &customer)?;

    let fields: Vec<(String, Option<String>)> = body
        .into_iter()
        .map(|(field, value)| (field, stringify(Some(value))))
        .collect();

    let updated = repo.update_fields(id, fields).await?;
    let view = view_with_live_counts(&state, updated).await?;

    Ok(Json(CustomerResponse {
        success: true,
        id,
        customer: view,
    }))
}

/// Update a single customer field
#[utoipa::path(
    put,
    path = "/api/customers/{id}/field",
    params(("id" = i32, Path, description = "Customer id")),
    request_body = FieldUpdateBody,
    responses(
        (status = 200, description = "Field updated", body = CustomerResponse),
        (status = 400, description = "Unknown field", body = ApiError),
        (status = 403, description = "Not your customer", body = ApiError),
        (status = 404, description = "Customer not found", body = ApiError)
    ),
    tag = "customers"
)]
pub async fn update_customer_field(
    State(state): State<AppState>,
    StaffSession(session): StaffSession,
    Path(id): Path<i32>,
    Json(body): Json<FieldUpdateBody>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let repo = CustomerRepository::new(&state.db);
    let customer = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| RepositoryError::not_found("Customer"))?;
    ensure_customer_access(&session, &customer)?;

    let updated = repo
        .update_field(id, &body.field, stringify(body.value))
        .await?;
    let view = view_with_live_counts(&state, updated).await?;

    Ok(Json(CustomerResponse {
        success: true,
        id,
        customer: view,
    }))
}

/// Replace the customer memo
#[utoipa::path(
    put,
    path = "/api/customers/{id}/memo",
    params(("id" = i32, Path, description = "Customer id")),
    request_body = MemoUpdateBody,
    responses(
        (status = 200, description = "Memo updated", body = CustomerResponse),
        (status = 403, description = "Not your customer", body = ApiError),
        (status = 404, description = "Customer not found", body = ApiError)
    ),
    tag = "customers"
)]
pub async fn update_customer_memo(
    State(state): State<AppState>,
    StaffSession(session): StaffSession,
    Path(id): Path<i32>,
    Json(body): Json<MemoUpdateBody>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let repo = CustomerRepository::new(&state.db);
    let customer = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| RepositoryError::not_found("Customer"))?;
    ensure_customer_access(&session, &customer)?;

    let updated = repo.update_memo(id, body.memo).await?;
    let view = view_with_live_counts(&state, updated).await?;

    Ok(Json(CustomerResponse {
        success: true,
        id,
        customer: view,
    }))
}

/// Delete a customer and everything on both of its boards
#[utoipa::path(
    delete,
    path = "/api/customers/{id}",
    params(("id" = i32, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Customer deleted"),
        (status = 403, description = "Not your customer", body = ApiError),
        (status = 404, description = "Customer not found", body = ApiError)
    ),
    tag = "customers"
)]
pub async fn delete_customer(
    State(state): State<AppState>,
    StaffSession(session): StaffSession,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let repo = CustomerRepository::new(&state.db);
    let customer = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| RepositoryError::not_found("Customer"))?;
    ensure_customer_access(&session, &customer)?;

    let purged = repo.delete_customer(id).await?;
    tracing::info!(customer_id = id, purged, "customer deleted");

    Ok(Json(
        serde_json::json!({ "success": true, "purged_links": purged }),
    ))
}
