//! # Guarantee-Insurance Catalogue
//!
//! The catalogue is a view over residential board entries whose
//! guarantee-insurance flag is set. Membership expires automatically once an
//! entry's `date_added` is 30 days old (inclusive); expiry only clears the
//! flag and never touches the entry itself.

use crate::error::RepositoryError;
use crate::models::guarantee_log::{
    ActiveModel as LogActiveModel, Entity as GuaranteeLog, Model as LogModel,
};
use crate::models::link::{Column, Entity as Link};
use crate::repositories::board::BoardEntry;
use chrono::{Duration, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

/// Most entries a catalogue listing returns.
const CATALOGUE_LIMIT: u64 = 50;

/// Repository for the guarantee-insurance catalogue (residential board only).
pub struct GuaranteeCatalog<'a> {
    db: &'a DatabaseConnection,
    expiry_days: i64,
}

impl<'a> GuaranteeCatalog<'a> {
    /// Create a catalogue bound to the configured expiry window.
    pub fn new(db: &'a DatabaseConnection, expiry_days: i64) -> Self {
        Self { db, expiry_days }
    }

    /// First date (YYYY-MM-DD) that is still within the expiry window.
    /// Entries added on or before the day *before* this date have expired.
    fn cutoff_date(&self) -> String {
        (Utc::now().date_naive() - Duration::days(self.expiry_days - 1)).to_string()
    }

    /// Current catalogue members, newest first, capped at 50.
    pub async fn list_catalogue(&self) -> Result<Vec<BoardEntry>, RepositoryError> {
        // Dates are stored as YYYY-MM-DD, so string comparison orders them.
        let rows = Link::find()
            .filter(Column::GuaranteeInsurance.eq(true))
            .filter(Column::IsDeleted.eq(false))
            .filter(Column::DateAdded.gte(self.cutoff_date()))
            .order_by_desc(Column::Id)
            .limit(CATALOGUE_LIMIT)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(rows.into_iter().map(BoardEntry::from).collect())
    }

    /// Promote an entry and append a click-log row.
    pub async fn log_click(
        &self,
        link_id: i32,
        management_site_id: Option<String>,
        user_ip: Option<String>,
    ) -> Result<LogModel, RepositoryError> {
        let updated = Link::update_many()
            .col_expr(Column::GuaranteeInsurance, Expr::value(true))
            .filter(Column::Id.eq(link_id))
            .exec(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        if updated.rows_affected == 0 {
            return Err(RepositoryError::not_found("Board entry"));
        }

        let log = LogActiveModel {
            management_site_id: Set(management_site_id),
            link_id: Set(link_id),
            click_time: Set(Utc::now().into()),
            user_ip: Set(user_ip),
            ..Default::default()
        };

        let row = log
            .insert(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(row)
    }

    /// Admin removal from the catalogue: clear the flag, keep the row.
    pub async fn remove_from_catalogue(&self, link_id: i32) -> Result<(), RepositoryError> {
        let updated = Link::update_many()
            .col_expr(Column::GuaranteeInsurance, Expr::value(false))
            .filter(Column::Id.eq(link_id))
            .exec(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        if updated.rows_affected == 0 {
            return Err(RepositoryError::not_found("Board entry"));
        }

        Ok(())
    }

    /// Bulk demote every catalogue entry added by one employee. Returns the
    /// number of entries demoted.
    pub async fn reset_by_employee(&self, employee_name: &str) -> Result<u64, RepositoryError> {
        let result = Link::update_many()
            .col_expr(Column::GuaranteeInsurance, Expr::value(false))
            .filter(Column::AddedBy.eq(employee_name))
            .filter(Column::GuaranteeInsurance.eq(true))
            .exec(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(result.rows_affected)
    }

    /// Demote every catalogue entry whose age has reached the expiry window.
    /// Idempotent; returns the number of entries demoted this pass.
    pub async fn expire_stale(&self) -> Result<u64, RepositoryError> {
        let result = Link::update_many()
            .col_expr(Column::GuaranteeInsurance, Expr::value(false))
            .filter(Column::GuaranteeInsurance.eq(true))
            .filter(Column::DateAdded.lt(self.cutoff_date()))
            .exec(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(result.rows_affected)
    }

    /// All click-log rows, newest first. Admin reporting.
    pub async fn click_log(&self) -> Result<Vec<LogModel>, RepositoryError> {
        let rows = GuaranteeLog::find()
            .order_by_desc(crate::models::guarantee_log::Column::Id)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::board::{BoardKind, BoardRepository, NewBoardEntry};
    use migration::MigratorTrait;
    use sea_orm::Database;

    async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        db
    }

    async fn add_entry(db: &DatabaseConnection, added_by: &str, date_added: &str) -> BoardEntry {
        BoardRepository::new(db, BoardKind::Residential)
            .create(NewBoardEntry {
                url: "https://a.example/1".to_string(),
                platform: "직방".to_string(),
                added_by: added_by.to_string(),
                date_added: date_added.to_string(),
                rating: 5,
                memo: String::new(),
                management_site_id: Some("a1b2c3d4".to_string()),
            })
            .await
            .unwrap()
    }

    fn today() -> String {
        Utc::now().date_naive().to_string()
    }

    fn days_ago(days: i64) -> String {
        (Utc::now().date_naive() - Duration::days(days)).to_string()
    }

    #[tokio::test]
    async fn test_log_click_promotes_and_logs() {
        let db = setup_test_db().await;
        let catalog = GuaranteeCatalog::new(&db, 30);

        let entry = add_entry(&db, "김대리", &today()).await;
        let log = catalog
            .log_click(entry.id, Some("a1b2c3d4".to_string()), Some("10.0.0.1".to_string()))
            .await
            .unwrap();
        assert_eq!(log.link_id, entry.id);

        let members = catalog.list_catalogue().await.unwrap();
        assert_eq!(members.len(), 1);
        assert!(members[0].guarantee_insurance);

        assert_eq!(catalog.click_log().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_log_click_missing_entry_not_found() {
        let db = setup_test_db().await;
        let catalog = GuaranteeCatalog::new(&db, 30);

        let result = catalog.log_click(999, None, None).await;
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_expiry_is_inclusive_at_thirty_days() {
        let db = setup_test_db().await;
        let catalog = GuaranteeCatalog::new(&db, 30);

        let fresh = add_entry(&db, "김대리", &days_ago(29)).await;
        let stale = add_entry(&db, "김대리", &days_ago(30)).await;
        catalog.log_click(fresh.id, None, None).await.unwrap();
        catalog.log_click(stale.id, None, None).await.unwrap();

        let expired = catalog.expire_stale().await.unwrap();
        assert_eq!(expired, 1);

        let members = catalog.list_catalogue().await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].id, fresh.id);

        // Idempotent: a second sweep finds nothing.
        assert_eq!(catalog.expire_stale().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_listing_hides_expired_even_before_sweep() {
        let db = setup_test_db().await;
        let catalog = GuaranteeCatalog::new(&db, 30);

        let stale = add_entry(&db, "김대리", &days_ago(31)).await;
        catalog.log_click(stale.id, None, None).await.unwrap();

        assert!(catalog.list_catalogue().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reset_by_employee() {
        let db = setup_test_db().await;
        let catalog = GuaranteeCatalog::new(&db, 30);

        let a = add_entry(&db, "김대리", &today()).await;
        let b = add_entry(&db, "김대리", &today()).await;
        let c = add_entry(&db, "박팀장", &today()).await;
        for id in [a.id, b.id, c.id] {
            catalog.log_click(id, None, None).await.unwrap();
        }

        assert_eq!(catalog.reset_by_employee("김대리").await.unwrap(), 2);

        let members = catalog.list_catalogue().await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].id, c.id);
    }

    #[tokio::test]
    async fn test_remove_from_catalogue_keeps_row() {
        let db = setup_test_db().await;
        let catalog = GuaranteeCatalog::new(&db, 30);

        let entry = add_entry(&db, "김대리", &today()).await;
        catalog.log_click(entry.id, None, None).await.unwrap();
        catalog.remove_from_catalogue(entry.id).await.unwrap();

        assert!(catalog.list_catalogue().await.unwrap().is_empty());

        let board = BoardRepository::new(&db, BoardKind::Residential);
        let survivor = board.find(entry.id).await.unwrap().unwrap();
        assert!(!survivor.guarantee_insurance);
        assert!(!survivor.is_deleted);
    }
}
