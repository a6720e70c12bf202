//! Link board endpoints for both the residential and the commercial board.
//!
//! Each board has its own route prefix but identical behavior, so the
//! handlers here are thin wrappers around board-generic cores. Staff sessions
//! and anonymous customers share these endpoints: a staff session grants
//! access to the shared pool, a share handle grants access to that customer's
//! board, and reactions are open to whoever can see the entry.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{MaybeStaff, StaffSession};
use crate::error::{forbidden, owner_gone, unauthorized, ApiError, RepositoryError};
use crate::repositories::board::{
    BoardEntry, BoardFilter, GuaranteeFilter, LikeFilter, NewBoardEntry,
};
use crate::repositories::{BoardKind, BoardRepository, CustomerRepository};
use crate::server::AppState;
use crate::session::Session;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListBoardQuery {
    /// Customer share handle; absent means the shared staff pool
    pub management_site_id: Option<String>,
    pub platform: Option<String>,
    /// Filter by the staff member who added the entry
    pub user: Option<String>,
    /// `liked` or `disliked`
    pub like: Option<String>,
    /// Exact date filter, `YYYY-MM-DD`
    pub date: Option<String>,
    /// `available` or `unavailable`
    pub guarantee: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBoardEntryBody {
    #[schema(example = "https://www.zigbang.com/home/12345")]
    pub url: String,
    #[schema(example = "직방")]
    pub platform: String,
    /// Defaults to 5
    pub rating: Option<i32>,
    pub memo: Option<String>,
    /// Target customer board; absent means the shared staff pool
    pub management_site_id: Option<String>,
    /// Defaults to today
    pub date_added: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateBoardQuery {
    /// Target customer board; overrides the body field when both are present
    pub management_site_id: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBoardEntryBody {
    /// One of `rating`, `like`, `dislike`, `memo`, `guarantee`
    #[schema(example = "like")]
    pub action: String,
    pub rating: Option<i32>,
    pub like: Option<bool>,
    pub dislike: Option<bool>,
    pub memo: Option<String>,
    pub guarantee: Option<bool>,
}

/// Board entry decorated with its display number. Numbers count down from the
/// total so the newest entry carries the highest number.
#[derive(Debug, Serialize, ToSchema)]
pub struct NumberedEntry {
    pub number: u64,
    #[serde(flatten)]
    pub entry: BoardEntry,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BoardListResponse {
    pub success: bool,
    pub links: Vec<NumberedEntry>,
    pub total: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BoardEntryResponse {
    pub success: bool,
    pub link: BoardEntry,
}

fn parse_like(raw: &str) -> Result<LikeFilter, ApiError> {
    match raw {
        "liked" => Ok(LikeFilter::Liked),
        "disliked" => Ok(LikeFilter::Disliked),
        _ => Err(RepositoryError::validation_error("like must be 'liked' or 'disliked'").into()),
    }
}

fn parse_guarantee(raw: &str) -> Result<GuaranteeFilter, ApiError> {
    match raw {
        "available" | "true" => Ok(GuaranteeFilter::Available),
        "unavailable" | "false" => Ok(GuaranteeFilter::Unavailable),
        _ => Err(RepositoryError::validation_error(
            "guarantee must be 'available' or 'unavailable'",
        )
        .into()),
    }
}

/// Ensure a handle still resolves to a live customer.
async fn require_owner(state: &AppState, management_site_id: &str) -> Result<(), ApiError> {
    let repo = CustomerRepository::new(&state.db);
    match repo.find_by_handle(management_site_id).await? {
        Some(_) => Ok(()),
        None => Err(owner_gone(management_site_id)),
    }
}

/// Refresh the cached unread counter after a reaction changed board state.
async fn reconcile_cache(
    state: &AppState,
    kind: BoardKind,
    management_site_id: &str,
) -> Result<(), ApiError> {
    let count = BoardRepository::new(&state.db, kind)
        .unchecked_count(management_site_id)
        .await?;
    CustomerRepository::new(&state.db)
        .set_unchecked_cache(management_site_id, kind, count)
        .await?;
    Ok(())
}

async fn list_board(
    state: AppState,
    kind: BoardKind,
    staff: Option<Session>,
    query: ListBoardQuery,
) -> Result<Json<BoardListResponse>, ApiError> {
    match &query.management_site_id {
        Some(handle) => require_owner(&state, handle).await?,
        // The shared pool is staff territory.
        None => {
            if staff.is_none() {
                return Err(unauthorized(Some("Staff session required")));
            }
        }
    }

    let filter = BoardFilter {
        management_site_id: query.management_site_id,
        platform: query.platform,
        user: query.user,
        like: query.like.as_deref().map(parse_like).transpose()?,
        date: query.date,
        guarantee: query.guarantee.as_deref().map(parse_guarantee).transpose()?,
    };

    let rows = BoardRepository::new(&state.db, kind).list(&filter).await?;
    let total = rows.len() as u64;
    let links = rows
        .into_iter()
        .enumerate()
        .map(|(index, entry)| NumberedEntry {
            number: total - index as u64,
            entry,
        })
        .collect();

    Ok(Json(BoardListResponse {
        success: true,
        links,
        total,
    }))
}

async fn create_board_entry(
    state: AppState,
    kind: BoardKind,
    staff: Option<Session>,
    body: CreateBoardEntryBody,
) -> Result<(StatusCode, Json<BoardEntryResponse>), ApiError> {
    let added_by = match &staff {
        Some(session) => session.name.clone(),
        None => {
            // Anonymous submissions only land on a handle-addressed board.
            if body.management_site_id.is_none() {
                return Err(unauthorized(Some("Staff session required")));
            }
            "중개사".to_string()
        }
    };

    if let Some(handle) = &body.management_site_id {
        require_owner(&state, handle).await?;
    }

    let entry = NewBoardEntry {
        url: body.url,
        platform: body.platform,
        added_by,
        date_added: body
            .date_added
            .unwrap_or_else(|| Utc::now().date_naive().to_string()),
        rating: body.rating.unwrap_or(5),
        memo: body.memo.unwrap_or_default(),
        management_site_id: body.management_site_id,
    };

    let created = BoardRepository::new(&state.db, kind).create(entry).await?;
    Ok((
        StatusCode::CREATED,
        Json(BoardEntryResponse {
            success: true,
            link: created,
        }),
    ))
}

async fn update_board_entry(
    state: AppState,
    kind: BoardKind,
    staff: Option<Session>,
    id: i32,
    body: UpdateBoardEntryBody,
) -> Result<Json<BoardEntryResponse>, ApiError> {
    let repo = BoardRepository::new(&state.db, kind);
    let existing = repo
        .find(id)
        .await?
        .ok_or_else(|| RepositoryError::not_found("Board entry"))?;

    if let Some(handle) = &existing.management_site_id {
        require_owner(&state, handle).await?;
    }

    let updated = match body.action.as_str() {
        // Reactions need no session, possession of the page is the credential.
        "like" => {
            let like = body.like.unwrap_or(true);
            let row = repo.set_like(id, like).await?;
            if let Some(handle) = &row.management_site_id {
                reconcile_cache(&state, kind, handle).await?;
            }
            row
        }
        "dislike" => {
            let dislike = body.dislike.unwrap_or(true);
            let row = repo.set_dislike(id, dislike).await?;
            if let Some(handle) = &row.management_site_id {
                reconcile_cache(&state, kind, handle).await?;
            }
            row
        }
        "rating" => {
            require_staff(&staff)?;
            let rating = body
                .rating
                .ok_or_else(|| RepositoryError::validation_error("rating is required"))?;
            repo.set_rating(id, rating).await?
        }
        "memo" => {
            require_staff(&staff)?;
            repo.set_memo(id, body.memo.unwrap_or_default()).await?
        }
        "guarantee" => {
            require_staff(&staff)?;
            repo.set_guarantee(id, body.guarantee.unwrap_or(true)).await?
        }
        other => {
            return Err(RepositoryError::validation_error(format!(
                "Unknown action '{}'",
                other
            ))
            .into())
        }
    };

    Ok(Json(BoardEntryResponse {
        success: true,
        link: updated,
    }))
}

fn require_staff(staff: &Option<Session>) -> Result<&Session, ApiError> {
    staff
        .as_ref()
        .ok_or_else(|| unauthorized(Some("Staff session required")))
}

async fn delete_board_entry(
    state: AppState,
    kind: BoardKind,
    session: Session,
    id: i32,
) -> Result<Json<serde_json::Value>, ApiError> {
    let repo = BoardRepository::new(&state.db, kind);
    let existing = repo
        .find(id)
        .await?
        .ok_or_else(|| RepositoryError::not_found("Board entry"))?;

    if !may_delete(&state, &session, &existing).await? {
        return Err(forbidden(Some("Not your entry")));
    }

    repo.delete(id).await?;

    // Deleting a liked entry changes the count behind the cache.
    if let Some(handle) = &existing.management_site_id {
        if CustomerRepository::new(&state.db)
            .find_by_handle(handle)
            .await?
            .is_some()
        {
            reconcile_cache(&state, kind, handle).await?;
        }
    }

    Ok(Json(serde_json::json!({ "success": true })))
}

/// Admins delete anything; others must have added the entry, own the customer,
/// or lead the owning employee's team.
async fn may_delete(
    state: &AppState,
    session: &Session,
    entry: &BoardEntry,
) -> Result<bool, ApiError> {
    if session.is_admin() {
        return Ok(true);
    }
    if entry.added_by == session.name {
        return Ok(true);
    }

    if let Some(handle) = &entry.management_site_id
        && let Some(customer) = CustomerRepository::new(&state.db)
            .find_by_handle(handle)
            .await?
    {
        if session.employee_id == Some(customer.employee_id) {
            return Ok(true);
        }
        if session.is_team_leader() && customer.employee_team == session.team {
            return Ok(true);
        }
    }

    Ok(false)
}

/// List residential board entries
#[utoipa::path(
    get,
    path = "/api/links",
    params(
        ("management_site_id" = Option<String>, Query, description = "Customer share handle; absent selects the shared pool"),
        ("platform" = Option<String>, Query, description = "Platform filter"),
        ("user" = Option<String>, Query, description = "Added-by filter"),
        ("like" = Option<String>, Query, description = "liked or disliked"),
        ("date" = Option<String>, Query, description = "Exact date, YYYY-MM-DD"),
        ("guarantee" = Option<String>, Query, description = "available or unavailable")
    ),
    responses(
        (status = 200, description = "Board entries, newest first", body = BoardListResponse),
        (status = 401, description = "Shared pool requires a staff session", body = ApiError),
        (status = 404, description = "Share handle no longer resolves", body = ApiError)
    ),
    tag = "links"
)]
pub async fn list_links(
    State(state): State<AppState>,
    MaybeStaff(staff): MaybeStaff,
    Query(query): Query<ListBoardQuery>,
) -> Result<Json<BoardListResponse>, ApiError> {
    list_board(state, BoardKind::Residential, staff, query).await
}

/// List commercial board entries
#[utoipa::path(
    get,
    path = "/api/office-links",
    params(
        ("management_site_id" = Option<String>, Query, description = "Customer share handle; absent selects the shared pool"),
        ("platform" = Option<String>, Query, description = "Platform filter"),
        ("user" = Option<String>, Query, description = "Added-by filter"),
        ("like" = Option<String>, Query, description = "liked or disliked"),
        ("date" = Option<String>, Query, description = "Exact date, YYYY-MM-DD"),
        ("guarantee" = Option<String>, Query, description = "available or unavailable")
    ),
    responses(
        (status = 200, description = "Board entries, newest first", body = BoardListResponse),
        (status = 401, description = "Shared pool requires a staff session", body = ApiError),
        (status = 404, description = "Share handle no longer resolves", body = ApiError)
    ),
    tag = "office-links"
)]
pub async fn list_office_links(
    State(state): State<AppState>,
    MaybeStaff(staff): MaybeStaff,
    Query(query): Query<ListBoardQuery>,
) -> Result<Json<BoardListResponse>, ApiError> {
    list_board(state, BoardKind::Commercial, staff, query).await
}

/// Add a residential board entry
#[utoipa::path(
    post,
    path = "/api/links",
    params(
        ("management_site_id" = Option<String>, Query, description = "Customer share handle; overrides the body field")
    ),
    request_body = CreateBoardEntryBody,
    responses(
        (status = 201, description = "Entry created", body = BoardEntryResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Anonymous submissions need a share handle", body = ApiError),
        (status = 404, description = "Share handle no longer resolves", body = ApiError)
    ),
    tag = "links"
)]
pub async fn create_link(
    State(state): State<AppState>,
    MaybeStaff(staff): MaybeStaff,
    Query(query): Query<CreateBoardQuery>,
    Json(mut body): Json<CreateBoardEntryBody>,
) -> Result<(StatusCode, Json<BoardEntryResponse>), ApiError> {
    if let Some(handle) = query.management_site_id {
        body.management_site_id = Some(handle);
    }
    create_board_entry(state, BoardKind::Residential, staff, body).await
}

/// Add a commercial board entry
#[utoipa::path(
    post,
    path = "/api/office-links",
    params(
        ("management_site_id" = Option<String>, Query, description = "Customer share handle; overrides the body field")
    ),
    request_body = CreateBoardEntryBody,
    responses(
        (status = 201, description = "Entry created", body = BoardEntryResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Anonymous submissions need a share handle", body = ApiError),
        (status = 404, description = "Share handle no longer resolves", body = ApiError)
    ),
    tag = "office-links"
)]
pub async fn create_office_link(
    State(state): State<AppState>,
    MaybeStaff(staff): MaybeStaff,
    Query(query): Query<CreateBoardQuery>,
    Json(mut body): Json<CreateBoardEntryBody>,
) -> Result<(StatusCode, Json<BoardEntryResponse>), ApiError> {
    if let Some(handle) = query.management_site_id {
        body.management_site_id = Some(handle);
    }
    create_board_entry(state, BoardKind::Commercial, staff, body).await
}

/// Update a residential board entry (rating, reaction, memo or guarantee)
#[utoipa::path(
    put,
    path = "/api/links/{id}",
    params(("id" = i32, Path, description = "Entry id")),
    request_body = UpdateBoardEntryBody,
    responses(
        (status = 200, description = "Entry updated", body = BoardEntryResponse),
        (status = 400, description = "Unknown action", body = ApiError),
        (status = 401, description = "Action requires a staff session", body = ApiError),
        (status = 404, description = "Entry or owning customer gone", body = ApiError)
    ),
    tag = "links"
)]
pub async fn update_link(
    State(state): State<AppState>,
    MaybeStaff(staff): MaybeStaff,
    Path(id): Path<i32>,
    Json(body): Json<UpdateBoardEntryBody>,
) -> Result<Json<BoardEntryResponse>, ApiError> {
    update_board_entry(state, BoardKind::Residential, staff, id, body).await
}

/// Update a commercial board entry (rating, reaction, memo or guarantee)
#[utoipa::path(
    put,
    path = "/api/office-links/{id}",
    params(("id" = i32, Path, description = "Entry id")),
    request_body = UpdateBoardEntryBody,
    responses(
        (status = 200, description = "Entry updated", body = BoardEntryResponse),
        (status = 400, description = "Unknown action", body = ApiError),
        (status = 401, description = "Action requires a staff session", body = ApiError),
        (status = 404, description = "Entry or owning customer gone", body = ApiError)
    ),
    tag = "office-links"
)]
pub async fn update_office_link(
    State(state): State<AppState>,
    MaybeStaff(staff): MaybeStaff,
    Path(id): Path<i32>,
    Json(body): Json<UpdateBoardEntryBody>,
) -> Result<Json<BoardEntryResponse>, ApiError> {
    update_board_entry(state, BoardKind::Commercial, staff, id, body).await
}

/// Delete a residential board entry
#[utoipa::path(
    delete,
    path = "/api/links/{id}",
    params(("id" = i32, Path, description = "Entry id")),
    responses(
        (status = 200, description = "Entry deleted"),
        (status = 401, description = "Not authenticated", body = ApiError),
        (status = 403, description = "Not your entry", body = ApiError),
        (status = 404, description = "Entry not found", body = ApiError)
    ),
    tag = "links"
)]
pub async fn delete_link(
    State(state): State<AppState>,
    StaffSession(session): StaffSession,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, ApiError> {
    delete_board_entry(state, BoardKind::Residential, session, id).await
}

/// Delete a commercial board entry
#[utoipa::path(
    delete,
    path = "/api/office-links/{id}",
    params(("id" = i32, Path, description = "Entry id")),
    responses(
        (status = 200, description = "Entry deleted"),
        (status = 401, description = "Not authenticated", body = ApiError),
        (status = 403, description = "Not your entry", body = ApiError),
        (status = 404, description = "Entry not found", body = ApiError)
    ),
    tag = "office-links"
)]
pub async fn delete_office_link(
    State(state): State<AppState>,
    StaffSession(session): StaffSession,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, ApiError> {
    delete_board_entry(state, BoardKind::Commercial, session, id).await
}
