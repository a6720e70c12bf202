//! Employee account management.
//!
//! Administrators manage everyone; team leaders manage their own team.
//! Deactivating or deleting an account also revokes that employee's live
//! sessions so the change takes effect immediately.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::StaffSession;
use crate::error::{forbidden, ApiError, RepositoryError};
use crate::models::employee::Model as EmployeeModel;
use crate::repositories::employee::{CreateEmployeeRequest, UpdateEmployeeRequest};
use crate::repositories::EmployeeRepository;
use crate::server::AppState;
use crate::session::Session;

/// Employee account as returned by the API. The password never leaves the
/// server; the model already skips it on serialization, this view drops it
/// from the type entirely.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EmployeeView {
    pub id: i32,
    pub name: String,
    pub team: String,
    #[schema(example = "employee")]
    pub role: String,
    pub status: String,
    pub created_at: String,
    pub last_login: Option<String>,
}

impl From<EmployeeModel> for EmployeeView {
    fn from(model: EmployeeModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            team: model.team,
            role: model.role,
            status: model.status,
            created_at: model.created_at.to_rfc3339(),
            last_login: model.last_login.map(|d| d.to_rfc3339()),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListEmployeesQuery {
    /// Admin only: restrict to one team
    pub team: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEmployeeBody {
    #[schema(example = "김영희")]
    pub name: String,
    pub team: Option<String>,
    /// `employee`, `team_leader` or `admin`; defaults to `employee`
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateEmployeeBody {
    pub name: Option<String>,
    pub team: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EmployeeResponse {
    pub success: bool,
    pub employee: EmployeeView,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EmployeeListResponse {
    pub success: bool,
    pub employees: Vec<EmployeeView>,
}

fn require_manager(session: &Session) -> Result<(), ApiError> {
    if session.is_admin() || session.is_team_leader() {
        Ok(())
    } else {
        Err(forbidden(Some("Manager access required")))
    }
}

/// Leaders may only touch accounts on their own team.
fn ensure_target_access(session: &Session, target: &EmployeeModel) -> Result<(), ApiError> {
    if session.is_admin() {
        return Ok(());
    }
    if session.is_team_leader() && target.team == session.team {
        return Ok(());
    }
    Err(forbidden(Some("Not your team")))
}

async fn require_employee(state: &AppState, id: i32) -> Result<EmployeeModel, ApiError> {
    EmployeeRepository::new(&state.db)
        .find_by_id(id)
        .await?
        .ok_or_else(|| RepositoryError::not_found("Employee").into())
}

/// List employee accounts
#[utoipa::path(
    get,
    path = "/api/employees",
    params(("team" = Option<String>, Query, description = "Admin only: restrict to one team")),
    responses(
        (status = 200, description = "Employees in scope", body = EmployeeListResponse),
        (status = 403, description = "Manager access required", body = ApiError)
    ),
    tag = "employees"
)]
pub async fn list_employees(
    State(state): State<AppState>,
    StaffSession(session): StaffSession,
    Query(query): Query<ListEmployeesQuery>,
) -> Result<Json<EmployeeListResponse>, ApiError> {
    require_manager(&session)?;

    let team = if session.is_admin() {
        query.team
    } else {
        Some(session.team.clone())
    };

    let employees = EmployeeRepository::new(&state.db)
        .list_employees(team.as_deref())
        .await?;

    Ok(Json(EmployeeListResponse {
        success: true,
        employees: employees.into_iter().map(EmployeeView::from).collect(),
    }))
}

/// Create an employee account with the default password
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployeeBody,
    responses(
        (status = 201, description = "Employee created", body = EmployeeResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 403, description = "Manager access required", body = ApiError),
        (status = 409, description = "Name already taken", body = ApiError)
    ),
    tag = "employees"
)]
pub async fn create_employee(
    State(state): State<AppState>,
    StaffSession(session): StaffSession,
    Json(body): Json<CreateEmployeeBody>,
) -> Result<(StatusCode, Json<EmployeeResponse>), ApiError> {
    require_manager(&session)?;

    let (team, role) = if session.is_admin() {
        (
            body.team.unwrap_or_default(),
            body.role.unwrap_or_else(|| "employee".to_string()),
        )
    } else {
        // Leaders hire into their own team, and only plain employees.
        (session.team.clone(), "employee".to_string())
    };

    let created = EmployeeRepository::new(&state.db)
        .create_employee(
            CreateEmployeeRequest {
                name: body.name,
                team,
                role,
            },
            &state.config.default_employee_password,
        )
        .await?;

    tracing::info!(employee_id = created.id, "employee account created");

    Ok((
        StatusCode::CREATED,
        Json(EmployeeResponse {
            success: true,
            employee: created.into(),
        }),
    ))
}

/// Deactivate an employee account and revoke its sessions
#[utoipa::path(
    put,
    path = "/api/employees/{id}/deactivate",
    params(("id" = i32, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Account deactivated", body = EmployeeResponse),
        (status = 403, description = "Not your team", body = ApiError),
        (status = 404, description = "Employee not found", body = ApiError)
    ),
    tag = "employees"
)]
pub async fn deactivate_employee(
    State(state): State<AppState>,
    StaffSession(session): StaffSession,
    Path(id): Path<i32>,
) -> Result<Json<EmployeeResponse>, ApiError> {
    require_manager(&session)?;
    let target = require_employee(&state, id).await?;
    ensure_target_access(&session, &target)?;

    let updated = EmployeeRepository::new(&state.db).deactivate(id).await?;
    let revoked = state.sessions.invalidate_employee(id);
    tracing::info!(employee_id = id, revoked, "employee deactivated");

    Ok(Json(EmployeeResponse {
        success: true,
        employee: updated.into(),
    }))
}

/// Reactivate an employee account
#[utoipa::path(
    put,
    path = "/api/employees/{id}/activate",
    params(("id" = i32, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Account reactivated", body = EmployeeResponse),
        (status = 403, description = "Not your team", body = ApiError),
        (status = 404, description = "Employee not found", body = ApiError)
    ),
    tag = "employees"
)]
pub async fn activate_employee(
    State(state): State<AppState>,
    StaffSession(session): StaffSession,
    Path(id): Path<i32>,
) -> Result<Json<EmployeeResponse>, ApiError> {
    require_manager(&session)?;
    let target = require_employee(&state, id).await?;
    ensure_target_access(&session, &target)?;

    let updated = EmployeeRepository::new(&state.db).activate(id).await?;

    Ok(Json(EmployeeResponse {
        success: true,
        employee: updated.into(),
    }))
}

/// Reset an employee's password to the default
#[utoipa::path(
    put,
    path = "/api/employees/{id}/reset-password",
    params(("id" = i32, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Password reset", body = EmployeeResponse),
        (status = 403, description = "Not your team", body = ApiError),
        (status = 404, description = "Employee not found", body = ApiError)
    ),
    tag = "employees"
)]
pub async fn reset_employee_password(
    State(state): State<AppState>,
    StaffSession(session): StaffSession,
    Path(id): Path<i32>,
) -> Result<Json<EmployeeResponse>, ApiError> {
    require_manager(&session)?;
    let target = require_employee(&state, id).await?;
    ensure_target_access(&session, &target)?;

    let updated = EmployeeRepository::new(&state.db)
        .reset_password(id, &state.config.default_employee_password)
        .await?;
    tracing::info!(employee_id = id, "password reset to default");

    Ok(Json(EmployeeResponse {
        success: true,
        employee: updated.into(),
    }))
}

/// Update an employee's name, team or role
#[utoipa::path(
    put,
    path = "/api/employees/{id}/update",
    params(("id" = i32, Path, description = "Employee id")),
    request_body = UpdateEmployeeBody,
    responses(
        (status = 200, description = "Employee updated", body = EmployeeResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 403, description = "Not your team", body = ApiError),
        (status = 404, description = "Employee not found", body = ApiError),
        (status = 409, description = "Name already taken", body = ApiError)
    ),
    tag = "employees"
)]
pub async fn update_employee(
    State(state): State<AppState>,
    StaffSession(session): StaffSession,
    Path(id): Path<i32>,
    Json(body): Json<UpdateEmployeeBody>,
) -> Result<Json<EmployeeResponse>, ApiError> {
    require_manager(&session)?;
    let target = require_employee(&state, id).await?;
    ensure_target_access(&session, &target)?;

    // Role and team changes are an admin concern.
    if !session.is_admin() && (body.role.is_some() || body.team.is_some()) {
        return Err(forbidden(Some("Administrator access required")));
    }

    let updated = EmployeeRepository::new(&state.db)
        .update_employee(
            id,
            UpdateEmployeeRequest {
                name: body.name,
                team: body.team,
                role: body.role,
            },
        )
        .await?;

    Ok(Json(EmployeeResponse {
        success: true,
        employee: updated.into(),
    }))
}

/// Deactivate an employee account (alias kept for older clients)
#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(("id" = i32, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Account deactivated", body = EmployeeResponse),
        (status = 403, description = "Not your team", body = ApiError),
        (status = 404, description = "Employee not found", body = ApiError)
    ),
    tag = "employees"
)]
pub async fn delete_employee(
    State(state): State<AppState>,
    session: StaffSession,
    Path(id): Path<i32>,
) -> Result<Json<EmployeeResponse>, ApiError> {
    deactivate_employee(State(state), session, Path(id)).await
}

/// Permanently delete an inactive employee account
#[utoipa::path(
    delete,
    path = "/api/employees/{id}/permanent-delete",
    params(("id" = i32, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Account removed"),
        (status = 400, description = "Account still active", body = ApiError),
        (status = 403, description = "Not your team", body = ApiError),
        (status = 404, description = "Employee not found", body = ApiError)
    ),
    tag = "employees"
)]
pub async fn permanent_delete_employee(
    State(state): State<AppState>,
    StaffSession(session): StaffSession,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_manager(&session)?;
    let target = require_employee(&state, id).await?;
    ensure_target_access(&session, &target)?;

    EmployeeRepository::new(&state.db).permanent_delete(id).await?;
    state.sessions.invalidate_employee(id);
    tracing::info!(employee_id = id, "employee permanently deleted");

    Ok(Json(serde_json::json!({ "success": true })))
}
