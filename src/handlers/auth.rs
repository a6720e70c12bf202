//! Login, admin login and logout endpoints.
//!
//! Sessions are server side: a successful login mints an opaque token in the
//! in-memory [`SessionStore`](crate::session::SessionStore) and returns it
//! both in the JSON body and as a `session_token` cookie, so browser clients
//! and API clients can use whichever transport suits them.

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use utoipa::ToSchema;

use crate::auth::{extract_token, SESSION_COOKIE};
use crate::error::ApiError;
use crate::repositories::employee::LoginOutcome;
use crate::repositories::EmployeeRepository;
use crate::server::AppState;
use crate::session::Session;

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Employee display name, names double as login identifiers
    #[schema(example = "김영희")]
    pub name: String,
    #[schema(example = "1234")]
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdminLoginRequest {
    #[schema(example = "admin")]
    pub admin_id: String,
    pub admin_password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl LoginResponse {
    fn failure(message: &str) -> Self {
        Self {
            success: false,
            message: Some(message.to_string()),
            redirect: None,
            role: None,
            token: None,
        }
    }

    fn success(redirect: &str, role: &str, token: String) -> Self {
        Self {
            success: true,
            message: None,
            redirect: Some(redirect.to_string()),
            role: Some(role.to_string()),
            token: Some(token),
        }
    }
}

fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax")
}

fn login_success_response(response: LoginResponse) -> Response {
    let cookie = session_cookie(response.token.as_deref().unwrap_or_default());
    let mut res = (StatusCode::OK, Json(response)).into_response();
    if let Ok(value) = cookie.parse() {
        res.headers_mut().insert(SET_COOKIE, value);
    }
    res
}

/// Employee login
///
/// Failed and inactive logins answer 200 with `success: false` so the login
/// form can surface the message without special-casing status codes.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login result", body = LoginResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let repo = EmployeeRepository::new(&state.db);

    match repo.authenticate(&request.name, &request.password).await? {
        LoginOutcome::Success(employee) => {
            let token = state.sessions.create(Session {
                employee_id: Some(employee.id),
                name: employee.name.clone(),
                team: employee.team.clone(),
                role: employee.role.clone(),
            });
            tracing::info!(employee_id = employee.id, "employee logged in");
            Ok(login_success_response(LoginResponse::success(
                "/",
                &employee.role,
                token,
            )))
        }
        LoginOutcome::Inactive => Ok(Json(LoginResponse::failure(
            "비활성화된 계정입니다. 관리자에게 문의하세요.",
        ))
        .into_response()),
        LoginOutcome::Failure => Ok(Json(LoginResponse::failure(
            "이름 또는 비밀번호가 올바르지 않습니다.",
        ))
        .into_response()),
    }
}

/// Administrator login against the configured credentials
#[utoipa::path(
    post,
    path = "/admin-login",
    request_body = AdminLoginRequest,
    responses(
        (status = 200, description = "Login result", body = LoginResponse)
    ),
    tag = "auth"
)]
pub async fn admin_login(
    State(state): State<AppState>,
    Json(request): Json<AdminLoginRequest>,
) -> Result<Response, ApiError> {
    let Some(expected_password) = state.config.admin_password.as_deref() else {
        return Ok(Json(LoginResponse::failure("관리자 로그인이 설정되지 않았습니다.")).into_response());
    };

    let id_ok = request
        .admin_id
        .as_bytes()
        .ct_eq(state.config.admin_id.as_bytes());
    let password_ok = request
        .admin_password
        .as_bytes()
        .ct_eq(expected_password.as_bytes());

    if !bool::from(id_ok & password_ok) {
        return Ok(Json(LoginResponse::failure(
            "관리자 정보가 올바르지 않습니다.",
        ))
        .into_response());
    }

    let token = state.sessions.create(Session {
        employee_id: None,
        name: state.config.admin_id.clone(),
        team: String::new(),
        role: "admin".to_string(),
    });
    tracing::info!("administrator logged in");
    Ok(login_success_response(LoginResponse::success(
        "/admin",
        "admin",
        token,
    )))
}

/// Invalidate the caller's session token
#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = 200, description = "Session removed")
    ),
    tag = "auth"
)]
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Json<serde_json::Value> {
    if let Some(token) = extract_token(&headers) {
        state.sessions.remove(&token);
    }
    Json(serde_json::json!({ "success": true }))
}
