//! # Customer Repository
//!
//! Customer records and their lifecycle. Creation mints the share handle and
//! plants the hidden marker row on both boards in one transaction; deletion
//! purges both boards and the customer row in one transaction.

use crate::error::RepositoryError;
use crate::ident;
use crate::models::customer::{
    ActiveModel as CustomerActiveModel, Column, Entity as Customer, Model as CustomerModel,
};
use crate::repositories::board::{insert_bootstrap_rows, purge_handle};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

/// Attempts at minting a fresh handle before giving up with a conflict.
const MINT_ATTEMPTS: usize = 5;

/// Fields a single-field update may touch. `status` is accepted as an alias
/// for `progress_status`.
pub const UPDATABLE_FIELDS: [&str; 12] = [
    "inquiry_date",
    "move_in_date",
    "customer_name",
    "customer_phone",
    "budget",
    "rooms",
    "location",
    "loan_needed",
    "parking_needed",
    "pets",
    "status",
    "memo",
];

/// Request data for creating a new customer
#[derive(Debug, Clone, Default)]
pub struct CreateCustomerRequest {
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub inquiry_date: Option<String>,
    pub move_in_date: Option<String>,
    /// Raw budget text as submitted; coerced to a number or dropped.
    pub budget: Option<String>,
    pub rooms: Option<String>,
    pub location: Option<String>,
    pub loan_needed: Option<String>,
    pub parking_needed: Option<String>,
    pub pets: Option<String>,
    pub memo: Option<String>,
}

/// Which customers a staff member may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerScope {
    /// Admin, or an explicit all-employees listing.
    All,
    /// Team leaders: every customer whose owning employee is on this team.
    Team(String),
    /// Plain employees: only their own customers.
    Owner(i32),
}

/// Coerce budget text into a number of 만원.
///
/// Accepts bare digits plus the decorations the intake form produces
/// (`5,000만원`, `3000 만원`, `5000원`). Anything else becomes None rather
/// than an error, matching how the records were historically captured.
pub fn coerce_budget(raw: &str) -> Option<i64> {
    let cleaned: String = raw
        .trim()
        .trim_end_matches("만원")
        .trim_end_matches('원')
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse().ok()
}

/// Repository for customer database operations
pub struct CustomerRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new CustomerRepository with the given database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a customer, mint its share handle, and plant the marker rows on
    /// both boards. The whole creation is one transaction.
    pub async fn create_customer(
        &self,
        request: CreateCustomerRequest,
        employee_id: i32,
        employee_name: &str,
        employee_team: &str,
    ) -> Result<CustomerModel, RepositoryError> {
        let customer_name = request.customer_name.trim();
        if customer_name.is_empty() {
            return Err(RepositoryError::validation_error(
                "customer_name is required",
            ));
        }

        let handle = self.mint_unique_handle().await?;
        let now = Utc::now();
        let budget = request.budget.as_deref().and_then(coerce_budget);

        let txn = self
            .db
            .begin()
            .await
            .map_err(RepositoryError::database_error)?;

        let customer = CustomerActiveModel {
            management_site_id: Set(handle.clone()),
            customer_name: Set(customer_name.to_string()),
            customer_phone: Set(request.customer_phone),
            inquiry_date: Set(request.inquiry_date),
            move_in_date: Set(request.move_in_date),
            budget: Set(budget),
            rooms: Set(request.rooms),
            location: Set(request.location),
            loan_needed: Set(request.loan_needed),
            parking_needed: Set(request.parking_needed),
            pets: Set(request.pets),
            memo: Set(request.memo),
            progress_status: Set("진행중".to_string()),
            employee_id: Set(employee_id),
            employee_name: Set(employee_name.to_string()),
            employee_team: Set(employee_team.to_string()),
            created_date: Set(now.into()),
            updated_date: Set(None),
            unchecked_likes_residence: Set(0),
            unchecked_likes_business: Set(0),
            ..Default::default()
        };

        let created = customer
            .insert(&txn)
            .await
            .map_err(RepositoryError::database_error)?;

        insert_bootstrap_rows(&txn, &handle, &now.date_naive().to_string())
            .await
            .map_err(RepositoryError::database_error)?;

        txn.commit().await.map_err(RepositoryError::database_error)?;

        Ok(created)
    }

    async fn mint_unique_handle(&self) -> Result<String, RepositoryError> {
        for _ in 0..MINT_ATTEMPTS {
            let candidate = ident::mint_handle();
            let taken = Customer::find()
                .filter(Column::ManagementSiteId.eq(candidate.clone()))
                .one(self.db)
                .await
                .map_err(RepositoryError::database_error)?
                .is_some();

            if !taken {
                return Ok(candidate);
            }
        }

        Err(RepositoryError::conflict(
            "Could not allocate a unique management site id",
        ))
    }

    /// List customers in scope, newest first, paginated.
    pub async fn list_customers(
        &self,
        scope: &CustomerScope,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<CustomerModel>, u64), RepositoryError> {
        let mut query = Customer::find().order_by_desc(Column::CreatedDate);

        query = match scope {
            CustomerScope::All => query,
            CustomerScope::Team(team) => query.filter(Column::EmployeeTeam.eq(team.clone())),
            CustomerScope::Owner(employee_id) => {
                query.filter(Column::EmployeeId.eq(*employee_id))
            }
        };

        let paginator = query.paginate(self.db, per_page.max(1));
        let total = paginator
            .num_items()
            .await
            .map_err(RepositoryError::database_error)?;
        let rows = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(RepositoryError::database_error)?;

        Ok((rows, total))
    }

    /// Get customer by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<CustomerModel>, RepositoryError> {
        let customer = Customer::find_by_id(id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(customer)
    }

    /// Resolve a share handle to its customer, if one still exists.
    pub async fn find_by_handle(
        &self,
        management_site_id: &str,
    ) -> Result<Option<CustomerModel>, RepositoryError> {
        let customer = Customer::find()
            .filter(Column::ManagementSiteId.eq(management_site_id))
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(customer)
    }

    async fn require(&self, id: i32) -> Result<CustomerModel, RepositoryError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Customer"))
    }

    /// Update a single allow-listed field. Unknown fields are rejected.
    pub async fn update_field(
        &self,
        id: i32,
        field: &str,
        value: Option<String>,
    ) -> Result<CustomerModel, RepositoryError> {
        if !UPDATABLE_FIELDS.contains(&field) {
            return Err(RepositoryError::validation_error(format!(
                "Field '{}' cannot be updated",
                field
            )));
        }

        let customer = self.require(id).await?;
        let mut active = customer.into_active_model();

        match field {
            "inquiry_date" => active.inquiry_date = Set(value),
            "move_in_date" => active.move_in_date = Set(value),
            "customer_name" => {
                let name = value.unwrap_or_default();
                if name.trim().is_empty() {
                    return Err(RepositoryError::validation_error(
                        "customer_name is required",
                    ));
                }
                active.customer_name = Set(name.trim().to_string());
            }
            "customer_phone" => active.customer_phone = Set(value),
            "budget" => active.budget = Set(value.as_deref().and_then(coerce_budget)),
            "rooms" => active.rooms = Set(value),
            "location" => active.location = Set(value),
            "loan_needed" => active.loan_needed = Set(value),
            "parking_needed" => active.parking_needed = Set(value),
            "pets" => active.pets = Set(value),
            "status" => active.progress_status = Set(value.unwrap_or_default()),
            "memo" => active.memo = Set(value),
            _ => unreachable!("field checked against allow-list"),
        }

        active.updated_date = Set(Some(Utc::now().into()));

        let result = active
            .update(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(result)
    }

    /// Update several allow-listed fields at once.
    pub async fn update_fields(
        &self,
        id: i32,
        fields: Vec<(String, Option<String>)>,
    ) -> Result<CustomerModel, RepositoryError> {
        for (field, _) in &fields {
            if !UPDATABLE_FIELDS.contains(&field.as_str()) {
                return Err(RepositoryError::validation_error(format!(
                    "Field '{}' cannot be updated",
                    field
                )));
            }
        }

        let mut latest = self.require(id).await?;
        for (field, value) in fields {
            latest = self.update_field(id, &field, value).await?;
        }

        Ok(latest)
    }

    /// Replace the customer memo.
    pub async fn update_memo(
        &self,
        id: i32,
        memo: Option<String>,
    ) -> Result<CustomerModel, RepositoryError> {
        let customer = self.require(id).await?;
        let mut active = customer.into_active_model();
        active.memo = Set(memo);
        active.updated_date = Set(Some(Utc::now().into()));

        let result = active
            .update(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(result)
    }

    /// Delete a customer and everything on both of its boards, in one
    /// transaction.
    pub async fn delete_customer(&self, id: i32) -> Result<u64, RepositoryError> {
        let customer = self.require(id).await?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(RepositoryError::database_error)?;

        let purged = purge_handle(&txn, &customer.management_site_id)
            .await
            .map_err(RepositoryError::database_error)?;

        Customer::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(RepositoryError::database_error)?;

        txn.commit().await.map_err(RepositoryError::database_error)?;

        Ok(purged)
    }

    /// Write a freshly recomputed unread count into the cached column. The
    /// cache exists for list views; readers that matter recompute instead.
    pub async fn set_unchecked_cache(
        &self,
        management_site_id: &str,
        kind: crate::repositories::BoardKind,
        count: u64,
    ) -> Result<(), RepositoryError> {
        let column = match kind {
            crate::repositories::BoardKind::Residential => Column::UncheckedLikesResidence,
            crate::repositories::BoardKind::Commercial => Column::UncheckedLikesBusiness,
        };

        Customer::update_many()
            .col_expr(column, Expr::value(count as i32))
            .filter(Column::ManagementSiteId.eq(management_site_id))
            .exec(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{BoardFilter, BoardKind, BoardRepository};
    use migration::MigratorTrait;
    use sea_orm::Database;

    async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        db
    }

    fn request(name: &str) -> CreateCustomerRequest {
        CreateCustomerRequest {
            customer_name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_budget_coercion() {
        assert_eq!(coerce_budget("5000"), Some(5000));
        assert_eq!(coerce_budget("5,000만원"), Some(5000));
        assert_eq!(coerce_budget("3000 만원"), Some(3000));
        assert_eq!(coerce_budget("10,000원"), Some(10000));
        assert_eq!(coerce_budget("미정"), None);
        assert_eq!(coerce_budget(""), None);
        assert_eq!(coerce_budget("만원"), None);
    }

    #[tokio::test]
    async fn test_create_mints_handle_and_bootstraps_boards() {
        let db = setup_test_db().await;
        let repo = CustomerRepository::new(&db);

        let created = repo
            .create_customer(request("홍길동"), 1, "김대리", "빈시트")
            .await
            .unwrap();

        assert!(crate::ident::is_valid_handle(&created.management_site_id));
        assert_eq!(created.progress_status, "진행중");
        assert_eq!(created.unchecked_likes_residence, 0);

        // Both boards carry exactly one hidden marker row.
        let filter = BoardFilter {
            management_site_id: Some(created.management_site_id.clone()),
            ..Default::default()
        };
        for kind in [BoardKind::Residential, BoardKind::Commercial] {
            let board = BoardRepository::new(&db, kind);
            assert!(board.list(&filter).await.unwrap().is_empty());
            assert_eq!(board.dump().await.unwrap().len(), 1);
        }
    }

    #[tokio::test]
    async fn test_create_requires_customer_name() {
        let db = setup_test_db().await;
        let repo = CustomerRepository::new(&db);

        let result = repo
            .create_customer(request("  "), 1, "김대리", "빈시트")
            .await;
        assert!(matches!(result, Err(RepositoryError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_coerces_budget_text() {
        let db = setup_test_db().await;
        let repo = CustomerRepository::new(&db);

        let created = repo
            .create_customer(
                CreateCustomerRequest {
                    customer_name: "홍길동".to_string(),
                    budget: Some("5,000만원".to_string()),
                    ..Default::default()
                },
                1,
                "김대리",
                "빈시트",
            )
            .await
            .unwrap();
        assert_eq!(created.budget, Some(5000));

        let created = repo
            .create_customer(
                CreateCustomerRequest {
                    customer_name: "임꺽정".to_string(),
                    budget: Some("미정".to_string()),
                    ..Default::default()
                },
                1,
                "김대리",
                "빈시트",
            )
            .await
            .unwrap();
        assert_eq!(created.budget, None);
    }

    #[tokio::test]
    async fn test_scoped_listing() {
        let db = setup_test_db().await;
        let repo = CustomerRepository::new(&db);

        repo.create_customer(request("고객A"), 1, "김대리", "빈시트")
            .await
            .unwrap();
        repo.create_customer(request("고객B"), 2, "박팀장", "빈시트")
            .await
            .unwrap();
        repo.create_customer(request("고객C"), 3, "이사원", "위플러스")
            .await
            .unwrap();

        let (all, total) = repo
            .list_customers(&CustomerScope::All, 1, 50)
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(total, 3);

        let (team, _) = repo
            .list_customers(&CustomerScope::Team("빈시트".to_string()), 1, 50)
            .await
            .unwrap();
        assert_eq!(team.len(), 2);

        let (own, _) = repo
            .list_customers(&CustomerScope::Owner(3), 1, 50)
            .await
            .unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].customer_name, "고객C");
    }

    #[tokio::test]
    async fn test_update_field_allow_list() {
        let db = setup_test_db().await;
        let repo = CustomerRepository::new(&db);

        let created = repo
            .create_customer(request("홍길동"), 1, "김대리", "빈시트")
            .await
            .unwrap();

        let updated = repo
            .update_field(created.id, "status", Some("계약완료".to_string()))
            .await
            .unwrap();
        assert_eq!(updated.progress_status, "계약완료");
        assert!(updated.updated_date.is_some());

        let updated = repo
            .update_field(created.id, "budget", Some("7,000만원".to_string()))
            .await
            .unwrap();
        assert_eq!(updated.budget, Some(7000));

        let result = repo
            .update_field(created.id, "employee_id", Some("99".to_string()))
            .await;
        assert!(matches!(result, Err(RepositoryError::Validation(_))));

        let result = repo.update_field(created.id, "customer_name", None).await;
        assert!(matches!(result, Err(RepositoryError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_cascades_both_boards() {
        let db = setup_test_db().await;
        let repo = CustomerRepository::new(&db);

        let created = repo
            .create_customer(request("홍길동"), 1, "김대리", "빈시트")
            .await
            .unwrap();

        let board = BoardRepository::new(&db, BoardKind::Residential);
        board
            .create(crate::repositories::board::NewBoardEntry {
                url: "https://a.example/1".to_string(),
                platform: "직방".to_string(),
                added_by: "김대리".to_string(),
                date_added: "2025-01-10".to_string(),
                rating: 5,
                memo: String::new(),
                management_site_id: Some(created.management_site_id.clone()),
            })
            .await
            .unwrap();

        // Marker rows on both boards plus the real entry.
        let purged = repo.delete_customer(created.id).await.unwrap();
        assert_eq!(purged, 3);
        assert!(repo.find_by_id(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unchecked_cache_reconciliation() {
        let db = setup_test_db().await;
        let repo = CustomerRepository::new(&db);

        let created = repo
            .create_customer(request("홍길동"), 1, "김대리", "빈시트")
            .await
            .unwrap();

        repo.set_unchecked_cache(&created.management_site_id, BoardKind::Residential, 3)
            .await
            .unwrap();

        let reloaded = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(reloaded.unchecked_likes_residence, 3);
        assert_eq!(reloaded.unchecked_likes_business, 0);
    }
}
