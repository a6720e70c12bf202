//! # Authentication and Authorization
//!
//! Session-token extraction for staff endpoints. The customer-facing board
//! endpoints carry no session at all; possession of a share handle is their
//! only credential, so they use no extractor from this module.

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header::AUTHORIZATION, header::COOKIE, request::Parts},
};

use crate::config::AppConfig;
use crate::error::{ApiError, forbidden, unauthorized};
use crate::server::AppState;
use crate::session::{Session, SessionStore};

/// Name of the session cookie set on login.
pub const SESSION_COOKIE: &str = "session_token";

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        Arc::clone(&app_state.config)
    }
}

impl FromRef<AppState> for Arc<SessionStore> {
    fn from_ref(app_state: &AppState) -> Self {
        Arc::clone(&app_state.sessions)
    }
}

/// Pull the session token from `Authorization: Bearer` or the session cookie.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get(AUTHORIZATION)
        && let Ok(header) = value.to_str()
        && let Some(token) = header.strip_prefix("Bearer ")
    {
        return Some(token.trim().to_string());
    }

    let cookie_header = headers.get(COOKIE)?.to_str().ok()?;
    cookie_header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

fn resolve_session(parts: &Parts, store: &SessionStore) -> Result<Session, ApiError> {
    let token = extract_token(&parts.headers)
        .ok_or_else(|| unauthorized(Some("Missing session token")))?;

    store
        .get(&token)
        .ok_or_else(|| unauthorized(Some("Invalid or expired session")))
}

/// Extractor for any authenticated staff member.
#[derive(Debug, Clone)]
pub struct StaffSession(pub Session);

impl<S> FromRequestParts<S> for StaffSession
where
    Arc<SessionStore>: FromRef<S>,
    S: Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let store = Arc::<SessionStore>::from_ref(state);
        resolve_session(parts, &store).map(StaffSession)
    }
}

/// Extractor that additionally requires the admin role.
#[derive(Debug, Clone)]
pub struct AdminSession(pub Session);

impl<S> FromRequestParts<S> for AdminSession
where
    Arc<SessionStore>: FromRef<S>,
    S: Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let store = Arc::<SessionStore>::from_ref(state);
        let session = resolve_session(parts, &store)?;

        if !session.is_admin() {
            return Err(forbidden(Some("Administrator access required")));
        }

        Ok(AdminSession(session))
    }
}

/// Extractor that never rejects: yields the staff session when present,
/// otherwise `None`. Used on endpoints anonymous customers may also call.
#[derive(Debug, Clone)]
pub struct MaybeStaff(pub Option<Session>);

impl<S> FromRequestParts<S> for MaybeStaff
where
    Arc<SessionStore>: FromRef<S>,
    S: Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let store = Arc::<SessionStore>::from_ref(state);
        Ok(MaybeStaff(resolve_session(parts, &store).ok()))
    }
}
