//! # Team Repository
//!
//! CRUD operations for teams, including the protected-team rule: the four
//! founding teams can never be deleted, and deleting any other team moves its
//! members to the sentinel team instead of orphaning them.

use crate::error::RepositoryError;
use crate::models::employee;
use crate::models::team::{ActiveModel as TeamActiveModel, Entity as Team, Model as TeamModel};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

/// Teams that can never be deleted.
pub const PROTECTED_TEAMS: [&str; 4] = ["빈시트", "위플러스", "반클리셰", "대표"];

/// Sentinel team members of a deleted team are reassigned to.
pub const UNASSIGNED_TEAM: &str = "미지정";

/// Repository for team database operations
pub struct TeamRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TeamRepository<'a> {
    /// Create a new TeamRepository with the given database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// List active teams, name order.
    pub async fn list_teams(&self) -> Result<Vec<TeamModel>, RepositoryError> {
        let teams = Team::find()
            .filter(crate::models::team::Column::IsActive.eq(true))
            .order_by_asc(crate::models::team::Column::Name)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(teams)
    }

    /// Create a new team. Duplicate names conflict.
    pub async fn create_team(
        &self,
        name: &str,
        description: &str,
    ) -> Result<TeamModel, RepositoryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RepositoryError::validation_error("Team name cannot be empty"));
        }

        if self.find_by_name(name).await?.is_some() {
            return Err(RepositoryError::conflict(format!(
                "Team '{}' already exists",
                name
            )));
        }

        let team = TeamActiveModel {
            name: Set(name.to_string()),
            description: Set(description.to_string()),
            is_active: Set(true),
            ..Default::default()
        };

        let result = team
            .insert(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(result)
    }

    /// Find a team by its exact name.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<TeamModel>, RepositoryError> {
        let team = Team::find()
            .filter(crate::models::team::Column::Name.eq(name))
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(team)
    }

    /// Delete a team by name. Protected teams are refused; members of the
    /// deleted team are reassigned to the sentinel team in the same
    /// transaction.
    ///
    /// Returns the number of employees that were reassigned.
    pub async fn delete_team(&self, name: &str) -> Result<u64, RepositoryError> {
        if PROTECTED_TEAMS.contains(&name) {
            return Err(RepositoryError::validation_error(format!(
                "Team '{}' is protected and cannot be deleted",
                name
            )));
        }

        let team = self
            .find_by_name(name)
            .await?
            .ok_or_else(|| RepositoryError::not_found(format!("Team '{}'", name)))?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(RepositoryError::database_error)?;

        // Make sure the sentinel team exists before pointing anyone at it.
        let sentinel_exists = Team::find()
            .filter(crate::models::team::Column::Name.eq(UNASSIGNED_TEAM))
            .one(&txn)
            .await
            .map_err(RepositoryError::database_error)?
            .is_some();

        if !sentinel_exists {
            TeamActiveModel {
                name: Set(UNASSIGNED_TEAM.to_string()),
                description: Set(String::new()),
                is_active: Set(true),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(RepositoryError::database_error)?;
        }

        let reassigned = employee::Entity::update_many()
            .col_expr(
                employee::Column::Team,
                sea_orm::sea_query::Expr::value(UNASSIGNED_TEAM),
            )
            .filter(employee::Column::Team.eq(name))
            .exec(&txn)
            .await
            .map_err(RepositoryError::database_error)?
            .rows_affected;

        team.delete(&txn)
            .await
            .map_err(RepositoryError::database_error)?;

        txn.commit().await.map_err(RepositoryError::database_error)?;

        Ok(reassigned)
    }
}
