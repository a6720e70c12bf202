//! # Board Repository
//!
//! One repository serving both link boards. The residential and commercial
//! boards are separate tables with identical shape, so every operation is
//! written once against a module alias and dispatched by [`BoardKind`].

use crate::error::RepositoryError;
use crate::models::{link, office_link};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, Statement,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Which of the two boards an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardKind {
    Residential,
    Commercial,
}

impl BoardKind {
    pub fn table_name(self) -> &'static str {
        match self {
            BoardKind::Residential => "links",
            BoardKind::Commercial => "office_links",
        }
    }
}

/// Run `$body` against the entity module of the selected board, bound as
/// `$board`. Both tables share one schema, so the body is written once.
macro_rules! on_board {
    ($kind:expr, $board:ident, $body:block) => {
        match $kind {
            BoardKind::Residential => {
                use crate::models::link as $board;
                $body
            }
            BoardKind::Commercial => {
                use crate::models::office_link as $board;
                $body
            }
        }
    };
}

/// Board entry as exposed over the API, independent of which table it lives in.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BoardEntry {
    pub id: i32,
    pub url: String,
    pub platform: String,
    pub added_by: String,
    pub date_added: String,
    pub rating: i32,
    pub liked: bool,
    pub disliked: bool,
    pub guarantee_insurance: bool,
    pub is_checked: bool,
    pub is_deleted: bool,
    pub memo: String,
    pub management_site_id: Option<String>,
}

macro_rules! entry_from_model {
    ($module:ident) => {
        impl From<$module::Model> for BoardEntry {
            fn from(m: $module::Model) -> Self {
                Self {
                    id: m.id,
                    url: m.url,
                    platform: m.platform,
                    added_by: m.added_by,
                    date_added: m.date_added,
                    rating: m.rating,
                    liked: m.liked,
                    disliked: m.disliked,
                    guarantee_insurance: m.guarantee_insurance,
                    is_checked: m.is_checked,
                    is_deleted: m.is_deleted,
                    memo: m.memo,
                    management_site_id: m.management_site_id,
                }
            }
        }
    };
}

entry_from_model!(link);
entry_from_model!(office_link);

/// Reaction filter for board listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeFilter {
    Liked,
    Disliked,
}

/// Guarantee-insurance filter for board listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuaranteeFilter {
    Available,
    Unavailable,
}

/// AND-combined listing filters. An absent `management_site_id` selects the
/// shared staff pool (rows with a NULL handle), never all rows.
#[derive(Debug, Clone, Default)]
pub struct BoardFilter {
    pub management_site_id: Option<String>,
    pub platform: Option<String>,
    pub user: Option<String>,
    pub like: Option<LikeFilter>,
    pub date: Option<String>,
    pub guarantee: Option<GuaranteeFilter>,
}

/// Data for a new board entry.
#[derive(Debug, Clone)]
pub struct NewBoardEntry {
    pub url: String,
    pub platform: String,
    pub added_by: String,
    pub date_added: String,
    pub rating: i32,
    pub memo: String,
    pub management_site_id: Option<String>,
}

/// Repository for board entry operations, parameterized over the board table.
pub struct BoardRepository<'a> {
    db: &'a DatabaseConnection,
    kind: BoardKind,
}

impl<'a> BoardRepository<'a> {
    /// Create a repository bound to one of the two boards.
    pub fn new(db: &'a DatabaseConnection, kind: BoardKind) -> Self {
        Self { db, kind }
    }

    pub fn kind(&self) -> BoardKind {
        self.kind
    }

    /// List live entries matching the filter, newest id first.
    pub async fn list(&self, filter: &BoardFilter) -> Result<Vec<BoardEntry>, RepositoryError> {
        on_board!(self.kind, board, {
            let mut query = board::Entity::find()
                .filter(board::Column::IsDeleted.eq(false))
                .order_by_desc(board::Column::Id);

            query = match &filter.management_site_id {
                Some(handle) => query.filter(board::Column::ManagementSiteId.eq(handle.clone())),
                None => query.filter(board::Column::ManagementSiteId.is_null()),
            };
            if let Some(platform) = &filter.platform {
                query = query.filter(board::Column::Platform.eq(platform.clone()));
            }
            if let Some(user) = &filter.user {
                query = query.filter(board::Column::AddedBy.eq(user.clone()));
            }
            query = match filter.like {
                Some(LikeFilter::Liked) => query.filter(board::Column::Liked.eq(true)),
                Some(LikeFilter::Disliked) => query.filter(board::Column::Disliked.eq(true)),
                None => query,
            };
            if let Some(date) = &filter.date {
                query = query.filter(board::Column::DateAdded.eq(date.clone()));
            }
            query = match filter.guarantee {
                Some(GuaranteeFilter::Available) => {
                    query.filter(board::Column::GuaranteeInsurance.eq(true))
                }
                Some(GuaranteeFilter::Unavailable) => {
                    query.filter(board::Column::GuaranteeInsurance.eq(false))
                }
                None => query,
            };

            let rows = query
                .all(self.db)
                .await
                .map_err(RepositoryError::database_error)?;

            Ok(rows.into_iter().map(BoardEntry::from).collect())
        })
    }

    /// Add a new entry to the board.
    pub async fn create(&self, entry: NewBoardEntry) -> Result<BoardEntry, RepositoryError> {
        if entry.url.trim().is_empty() {
            return Err(RepositoryError::validation_error("url is required"));
        }
        if entry.platform.trim().is_empty() {
            return Err(RepositoryError::validation_error("platform is required"));
        }
        if !(0..=5).contains(&entry.rating) {
            return Err(RepositoryError::validation_error(
                "rating must be between 0 and 5",
            ));
        }

        on_board!(self.kind, board, {
            let model = board::ActiveModel {
                url: Set(entry.url),
                platform: Set(entry.platform),
                added_by: Set(entry.added_by),
                date_added: Set(entry.date_added),
                rating: Set(entry.rating),
                liked: Set(false),
                disliked: Set(false),
                guarantee_insurance: Set(false),
                is_checked: Set(false),
                is_deleted: Set(false),
                memo: Set(entry.memo),
                management_site_id: Set(entry.management_site_id),
                ..Default::default()
            };

            let row = model
                .insert(self.db)
                .await
                .map_err(RepositoryError::database_error)?;

            Ok(row.into())
        })
    }

    /// Fetch a single entry by id, deleted or not.
    pub async fn find(&self, id: i32) -> Result<Option<BoardEntry>, RepositoryError> {
        on_board!(self.kind, board, {
            let row = board::Entity::find_by_id(id)
                .one(self.db)
                .await
                .map_err(RepositoryError::database_error)?;

            Ok(row.map(BoardEntry::from))
        })
    }

    async fn require(&self, id: i32) -> Result<BoardEntry, RepositoryError> {
        self.find(id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Board entry"))
    }

    /// Set the star rating (0 to 5).
    pub async fn set_rating(&self, id: i32, rating: i32) -> Result<BoardEntry, RepositoryError> {
        if !(0..=5).contains(&rating) {
            return Err(RepositoryError::validation_error(
                "rating must be between 0 and 5",
            ));
        }

        self.require(id).await?;
        on_board!(self.kind, board, {
            let row = board::ActiveModel {
                id: Set(id),
                rating: Set(rating),
                ..Default::default()
            }
            .update(self.db)
            .await
            .map_err(RepositoryError::database_error)?;
            Ok(row.into())
        })
    }

    /// Apply a like or un-like.
    ///
    /// Liking sets `liked`, clears `disliked`, and reopens the entry for
    /// acknowledgement by clearing `is_checked` even when the entry was
    /// already liked. Un-liking clears both `liked` and `is_checked`.
    pub async fn set_like(&self, id: i32, like: bool) -> Result<BoardEntry, RepositoryError> {
        self.require(id).await?;
        on_board!(self.kind, board, {
            let mut active = board::ActiveModel {
                id: Set(id),
                liked: Set(like),
                is_checked: Set(false),
                ..Default::default()
            };
            if like {
                active.disliked = Set(false);
            }
            let row = active
                .update(self.db)
                .await
                .map_err(RepositoryError::database_error)?;
            Ok(row.into())
        })
    }

    /// Apply a dislike or un-dislike. Disliking clears `liked`.
    pub async fn set_dislike(&self, id: i32, dislike: bool) -> Result<BoardEntry, RepositoryError> {
        self.require(id).await?;
        on_board!(self.kind, board, {
            let mut active = board::ActiveModel {
                id: Set(id),
                disliked: Set(dislike),
                ..Default::default()
            };
            if dislike {
                active.liked = Set(false);
            }
            let row = active
                .update(self.db)
                .await
                .map_err(RepositoryError::database_error)?;
            Ok(row.into())
        })
    }

    /// Replace the entry memo.
    pub async fn set_memo(&self, id: i32, memo: String) -> Result<BoardEntry, RepositoryError> {
        self.require(id).await?;
        on_board!(self.kind, board, {
            let row = board::ActiveModel {
                id: Set(id),
                memo: Set(memo),
                ..Default::default()
            }
            .update(self.db)
            .await
            .map_err(RepositoryError::database_error)?;
            Ok(row.into())
        })
    }

    /// Promote or demote the guarantee-insurance flag.
    pub async fn set_guarantee(&self, id: i32, value: bool) -> Result<BoardEntry, RepositoryError> {
        self.require(id).await?;
        on_board!(self.kind, board, {
            let row = board::ActiveModel {
                id: Set(id),
                guarantee_insurance: Set(value),
                ..Default::default()
            }
            .update(self.db)
            .await
            .map_err(RepositoryError::database_error)?;
            Ok(row.into())
        })
    }

    /// Hard-delete an entry.
    pub async fn delete(&self, id: i32) -> Result<(), RepositoryError> {
        on_board!(self.kind, board, {
            let result = board::Entity::delete_by_id(id)
                .exec(self.db)
                .await
                .map_err(RepositoryError::database_error)?;

            if result.rows_affected == 0 {
                return Err(RepositoryError::not_found("Board entry"));
            }

            Ok(())
        })
    }

    /// Acknowledge every open like on a customer's board. Returns the number
    /// of entries that flipped.
    pub async fn acknowledge(&self, management_site_id: &str) -> Result<u64, RepositoryError> {
        on_board!(self.kind, board, {
            let result = board::Entity::update_many()
                .col_expr(board::Column::IsChecked, Expr::value(true))
                .filter(board::Column::ManagementSiteId.eq(management_site_id))
                .filter(board::Column::Liked.eq(true))
                .filter(board::Column::IsChecked.eq(false))
                .filter(board::Column::IsDeleted.eq(false))
                .exec(self.db)
                .await
                .map_err(RepositoryError::database_error)?;

            Ok(result.rows_affected)
        })
    }

    /// Authoritative unread-like count for a customer's board, recomputed
    /// from the rows rather than any cached column.
    pub async fn unchecked_count(&self, management_site_id: &str) -> Result<u64, RepositoryError> {
        on_board!(self.kind, board, {
            let count = board::Entity::find()
                .filter(board::Column::ManagementSiteId.eq(management_site_id))
                .filter(board::Column::Liked.eq(true))
                .filter(board::Column::IsChecked.eq(false))
                .filter(board::Column::IsDeleted.eq(false))
                .count(self.db)
                .await
                .map_err(RepositoryError::database_error)?;

            Ok(count)
        })
    }

    /// Every row on the board, deleted markers included. Used by backup.
    pub async fn dump(&self) -> Result<Vec<BoardEntry>, RepositoryError> {
        on_board!(self.kind, board, {
            let rows = board::Entity::find()
                .order_by_asc(board::Column::Id)
                .all(self.db)
                .await
                .map_err(RepositoryError::database_error)?;

            Ok(rows.into_iter().map(BoardEntry::from).collect())
        })
    }
}

/// Insert the hidden marker row each board carries for a new customer. The
/// marker holds the handle so the board "exists" from day one, but it is
/// born deleted so listings stay empty.
pub async fn insert_bootstrap_rows<C: ConnectionTrait>(
    conn: &C,
    management_site_id: &str,
    date_added: &str,
) -> Result<(), DbErr> {
    link::ActiveModel {
        url: Set(String::new()),
        platform: Set("etc".to_string()),
        added_by: Set(String::new()),
        date_added: Set(date_added.to_string()),
        rating: Set(5),
        liked: Set(false),
        disliked: Set(false),
        guarantee_insurance: Set(false),
        is_checked: Set(false),
        is_deleted: Set(true),
        memo: Set(String::new()),
        management_site_id: Set(Some(management_site_id.to_string())),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    office_link::ActiveModel {
        url: Set(String::new()),
        platform: Set("etc".to_string()),
        added_by: Set(String::new()),
        date_added: Set(date_added.to_string()),
        rating: Set(5),
        liked: Set(false),
        disliked: Set(false),
        guarantee_insurance: Set(false),
        is_checked: Set(false),
        is_deleted: Set(true),
        memo: Set(String::new()),
        management_site_id: Set(Some(management_site_id.to_string())),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    Ok(())
}

/// Hard-delete every row on both boards carrying the given handle. Returns
/// the total number of rows removed.
pub async fn purge_handle<C: ConnectionTrait>(
    conn: &C,
    management_site_id: &str,
) -> Result<u64, DbErr> {
    let residential = link::Entity::delete_many()
        .filter(link::Column::ManagementSiteId.eq(management_site_id))
        .exec(conn)
        .await?
        .rows_affected;

    let commercial = office_link::Entity::delete_many()
        .filter(office_link::Column::ManagementSiteId.eq(management_site_id))
        .exec(conn)
        .await?
        .rows_affected;

    Ok(residential + commercial)
}

/// Wipe a board table and reload it from backup entries, preserving ids so a
/// backup-then-restore cycle is a no-op.
pub async fn replace_all<C: ConnectionTrait>(
    conn: &C,
    kind: BoardKind,
    entries: &[BoardEntry],
) -> Result<(), DbErr> {
    on_board!(kind, board, {
        board::Entity::delete_many().exec(conn).await?;

        for entry in entries {
            board::ActiveModel {
                id: Set(entry.id),
                url: Set(entry.url.clone()),
                platform: Set(entry.platform.clone()),
                added_by: Set(entry.added_by.clone()),
                date_added: Set(entry.date_added.clone()),
                rating: Set(entry.rating),
                liked: Set(entry.liked),
                disliked: Set(entry.disliked),
                guarantee_insurance: Set(entry.guarantee_insurance),
                is_checked: Set(entry.is_checked),
                is_deleted: Set(entry.is_deleted),
                memo: Set(entry.memo.clone()),
                management_site_id: Set(entry.management_site_id.clone()),
            }
            .insert(conn)
            .await?;
        }

        // Explicit-id inserts leave the Postgres identity sequence behind the
        // restored rows; advance it so the next insert cannot collide.
        if conn.get_database_backend() == DbBackend::Postgres {
            let table = kind.table_name();
            conn.execute(Statement::from_string(
                DbBackend::Postgres,
                format!(
                    "SELECT setval(pg_get_serial_sequence('{table}', 'id'), \
                     COALESCE((SELECT MAX(id) FROM {table}), 0) + 1, false)"
                ),
            ))
            .await?;
        }

        Ok(())
    })
}
