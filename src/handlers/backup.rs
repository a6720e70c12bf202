//! Backup, restore and maintenance endpoints, plus the shared banner row.
//!
//! Backup dumps both board tables verbatim, deleted markers included, so a
//! restore reproduces the exact state. Restore wipes and reloads inside one
//! transaction: either the whole backup lands or none of it does.

use axum::extract::{Path, State};
use axum::response::Json;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{AdminSession, StaffSession};
use crate::error::{ApiError, RepositoryError};
use crate::models::customer_info;
use crate::repositories::board::{replace_all, purge_handle, BoardEntry};
use crate::repositories::{BoardKind, BoardRepository, CustomerRepository};
use crate::server::AppState;

/// Id of the single banner row.
const BANNER_ROW_ID: i32 = 1;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BackupPayload {
    pub backup_date: String,
    pub links: Vec<BoardEntry>,
    pub office_links: Vec<BoardEntry>,
    pub customer_info: Option<BannerInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BannerInfo {
    #[schema(example = "제일좋은집 찾아드릴분")]
    pub customer_name: String,
    pub move_in_date: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BannerUpdateBody {
    pub customer_name: Option<String>,
    pub move_in_date: Option<String>,
}

async fn load_banner(state: &AppState) -> Result<Option<customer_info::Model>, ApiError> {
    let row = customer_info::Entity::find_by_id(BANNER_ROW_ID)
        .one(&state.db)
        .await
        .map_err(RepositoryError::database_error)?;
    Ok(row)
}

/// Dump both boards and the banner row
#[utoipa::path(
    get,
    path = "/api/backup",
    responses(
        (status = 200, description = "Full board backup", body = BackupPayload),
        (status = 403, description = "Administrator access required", body = ApiError)
    ),
    tag = "maintenance"
)]
pub async fn backup(
    State(state): State<AppState>,
    AdminSession(_session): AdminSession,
) -> Result<Json<BackupPayload>, ApiError> {
    let links = BoardRepository::new(&state.db, BoardKind::Residential)
        .dump()
        .await?;
    let office_links = BoardRepository::new(&state.db, BoardKind::Commercial)
        .dump()
        .await?;
    let banner = load_banner(&state).await?.map(|row| BannerInfo {
        customer_name: row.customer_name,
        move_in_date: row.move_in_date,
    });

    Ok(Json(BackupPayload {
        backup_date: Utc::now().to_rfc3339(),
        links,
        office_links,
        customer_info: banner,
    }))
}

/// Replace both boards and the banner row from a backup
#[utoipa::path(
    post,
    path = "/api/restore",
    request_body = BackupPayload,
    responses(
        (status = 200, description = "Backup restored"),
        (status = 403, description = "Administrator access required", body = ApiError)
    ),
    tag = "maintenance"
)]
pub async fn restore(
    State(state): State<AppState>,
    AdminSession(_session): AdminSession,
    Json(payload): Json<BackupPayload>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let txn = state
        .db
        .begin()
        .await
        .map_err(RepositoryError::database_error)?;

    replace_all(&txn, BoardKind::Residential, &payload.links)
        .await
        .map_err(RepositoryError::database_error)?;
    replace_all(&txn, BoardKind::Commercial, &payload.office_links)
        .await
        .map_err(RepositoryError::database_error)?;

    if let Some(banner) = &payload.customer_info {
        customer_info::Entity::delete_by_id(BANNER_ROW_ID)
            .exec(&txn)
            .await
            .map_err(RepositoryError::database_error)?;
        customer_info::ActiveModel {
            id: Set(BANNER_ROW_ID),
            customer_name: Set(banner.customer_name.clone()),
            move_in_date: Set(banner.move_in_date.clone()),
        }
        .insert(&txn)
        .await
        .map_err(RepositoryError::database_error)?;
    }

    txn.commit().await.map_err(RepositoryError::database_error)?;

    tracing::info!(
        links = payload.links.len(),
        office_links = payload.office_links.len(),
        "backup restored"
    );

    Ok(Json(serde_json::json!({
        "success": true,
        "links": payload.links.len(),
        "office_links": payload.office_links.len(),
    })))
}

/// Purge orphaned board rows for a handle with no owning customer
///
/// Refuses to touch a handle that still resolves; deleting a live customer's
/// board goes through the customer delete endpoint instead.
#[utoipa::path(
    delete,
    path = "/api/admin/cleanup-customer-links/{management_site_id}",
    params(("management_site_id" = String, Path, description = "Orphaned share handle")),
    responses(
        (status = 200, description = "Orphaned rows purged"),
        (status = 400, description = "Handle still owned", body = ApiError),
        (status = 403, description = "Administrator access required", body = ApiError)
    ),
    tag = "maintenance"
)]
pub async fn cleanup_customer_links(
    State(state): State<AppState>,
    AdminSession(_session): AdminSession,
    Path(management_site_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if CustomerRepository::new(&state.db)
        .find_by_handle(&management_site_id)
        .await?
        .is_some()
    {
        return Err(RepositoryError::validation_error(
            "Handle still belongs to a customer; delete the customer instead",
        )
        .into());
    }

    let deleted = purge_handle(&state.db, &management_site_id)
        .await
        .map_err(RepositoryError::database_error)?;
    tracing::info!(%management_site_id, deleted, "orphaned board rows purged");

    Ok(Json(
        serde_json::json!({ "success": true, "deleted": deleted }),
    ))
}

/// Read the shared banner row
#[utoipa::path(
    get,
    path = "/api/customer_info",
    responses(
        (status = 200, description = "Banner content", body = BannerInfo),
        (status = 404, description = "Banner row missing", body = ApiError)
    ),
    tag = "maintenance"
)]
pub async fn get_customer_info(
    State(state): State<AppState>,
) -> Result<Json<BannerInfo>, ApiError> {
    let row = load_banner(&state)
        .await?
        .ok_or_else(|| RepositoryError::not_found("Banner"))?;

    Ok(Json(BannerInfo {
        customer_name: row.customer_name,
        move_in_date: row.move_in_date,
    }))
}

/// Update the shared banner row
#[utoipa::path(
    post,
    path = "/api/customer_info",
    request_body = BannerUpdateBody,
    responses(
        (status = 200, description = "Banner updated", body = BannerInfo),
        (status = 401, description = "Not authenticated", body = ApiError)
    ),
    tag = "maintenance"
)]
pub async fn update_customer_info(
    State(state): State<AppState>,
    StaffSession(_session): StaffSession,
    Json(body): Json<BannerUpdateBody>,
) -> Result<Json<BannerInfo>, ApiError> {
    let existing = load_banner(&state).await?;

    let (name, date) = match &existing {
        Some(row) => (
            body.customer_name
                .unwrap_or_else(|| row.customer_name.clone()),
            body.move_in_date.unwrap_or_else(|| row.move_in_date.clone()),
        ),
        None => (
            body.customer_name
                .unwrap_or_else(|| "제일좋은집 찾아드릴분".to_string()),
            body.move_in_date.unwrap_or_default(),
        ),
    };

    if existing.is_some() {
        customer_info::ActiveModel {
            id: Set(BANNER_ROW_ID),
            customer_name: Set(name.clone()),
            move_in_date: Set(date.clone()),
        }
        .update(&state.db)
        .await
        .map_err(RepositoryError::database_error)?;
    } else {
        customer_info::ActiveModel {
            id: Set(BANNER_ROW_ID),
            customer_name: Set(name.clone()),
            move_in_date: Set(date.clone()),
        }
        .insert(&state.db)
        .await
        .map_err(RepositoryError::database_error)?;
    }

    Ok(Json(BannerInfo {
        customer_name: name,
        move_in_date: date,
    }))
}
