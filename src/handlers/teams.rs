//! Team management endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{AdminSession, StaffSession};
use crate::error::ApiError;
use crate::models::team::Model as TeamModel;
use crate::repositories::TeamRepository;
use crate::server::AppState;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TeamView {
    pub id: i32,
    #[schema(example = "빈시트")]
    pub name: String,
    pub description: String,
}

impl From<TeamModel> for TeamView {
    fn from(model: TeamModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTeamBody {
    #[schema(example = "강남지점")]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TeamListResponse {
    pub success: bool,
    pub teams: Vec<TeamView>,
}

/// List active teams
#[utoipa::path(
    get,
    path = "/api/teams",
    responses(
        (status = 200, description = "Active teams", body = TeamListResponse),
        (status = 401, description = "Not authenticated", body = ApiError)
    ),
    tag = "teams"
)]
pub async fn list_teams(
    State(state): State<AppState>,
    StaffSession(_session): StaffSession,
) -> Result<Json<TeamListResponse>, ApiError> {
    let teams = TeamRepository::new(&state.db).list_teams().await?;

    Ok(Json(TeamListResponse {
        success: true,
        teams: teams.into_iter().map(TeamView::from).collect(),
    }))
}

/// Create a team
#[utoipa::path(
    post,
    path = "/api/teams",
    request_body = CreateTeamBody,
    responses(
        (status = 201, description = "Team created", body = TeamView),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 403, description = "Administrator access required", body = ApiError),
        (status = 409, description = "Team already exists", body = ApiError)
    ),
    tag = "teams"
)]
pub async fn create_team(
    State(state): State<AppState>,
    AdminSession(_session): AdminSession,
    Json(body): Json<CreateTeamBody>,
) -> Result<(StatusCode, Json<TeamView>), ApiError> {
    let created = TeamRepository::new(&state.db)
        .create_team(&body.name, body.description.as_deref().unwrap_or_default())
        .await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Delete a team, reassigning its members to the unassigned bucket
#[utoipa::path(
    delete,
    path = "/api/teams/{name}",
    params(("name" = String, Path, description = "Team name")),
    responses(
        (status = 200, description = "Team deleted, members reassigned"),
        (status = 400, description = "Protected team", body = ApiError),
        (status = 403, description = "Administrator access required", body = ApiError),
        (status = 404, description = "Team not found", body = ApiError)
    ),
    tag = "teams"
)]
pub async fn delete_team(
    State(state): State<AppState>,
    AdminSession(_session): AdminSession,
    Path(name): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let reassigned = TeamRepository::new(&state.db).delete_team(&name).await?;
    tracing::info!(team = %name, reassigned, "team deleted");

    Ok(Json(
        serde_json::json!({ "success": true, "reassigned": reassigned }),
    ))
}
