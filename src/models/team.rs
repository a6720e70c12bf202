//! Team entity model

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Team entity representing an office team
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "teams")]
pub struct Model {
    /// Unique identifier for the team (primary key)
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Team name, unique across the table
    pub name: String,

    /// Free-form description
    pub description: String,

    /// Inactive teams are hidden from pickers but keep their history
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
