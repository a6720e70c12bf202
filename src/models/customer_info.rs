//! Shared customer-facing banner model
//!
//! Single-row table (id = 1) holding the display name and move-in date shown
//! on anonymous board pages that are not tied to a specific customer.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "customer_info")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub customer_name: String,

    pub move_in_date: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
