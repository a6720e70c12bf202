//! Employee entity model
//!
//! Staff accounts. Login names are unique; `role` is one of
//! `admin`, `team_leader` or `employee` and `status` is `active` or `inactive`.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;

/// Employee entity representing a staff account
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    /// Unique identifier for the employee (primary key)
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Login name, unique across the table
    pub name: String,

    /// Team the employee belongs to (empty string when unassigned)
    pub team: String,

    /// Role: `admin`, `team_leader` or `employee`
    pub role: String,

    /// Account status: `active` or `inactive`
    pub status: String,

    /// Login password (plaintext, matching the legacy data model)
    #[serde(skip_serializing)]
    pub password: String,

    /// Timestamp when the account was created
    pub created_at: DateTimeWithTimeZone,

    /// Timestamp of the most recent successful login
    pub last_login: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }

    pub fn is_team_leader(&self) -> bool {
        self.role == "team_leader"
    }

    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}
