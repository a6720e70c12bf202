//! Residential board entry model
//!
//! Listing links shared with a customer on the residential board. Deletion is
//! a soft flag so reactions and counters can still be reconciled afterwards.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "links")]
pub struct Model {
    /// Unique identifier for the entry (primary key)
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Listing URL
    pub url: String,

    /// Source platform the listing came from
    pub platform: String,

    /// Display name of whoever added the entry
    pub added_by: String,

    /// Date the entry was added (YYYY-MM-DD)
    pub date_added: String,

    /// Star rating, 0 to 5
    pub rating: i32,

    /// Customer reaction; liked and disliked are mutually exclusive
    pub liked: bool,
    pub disliked: bool,

    /// Guarantee-insurance availability flag
    pub guarantee_insurance: bool,

    /// Whether staff acknowledged the like
    pub is_checked: bool,

    /// Soft-delete flag
    pub is_deleted: bool,

    pub memo: String,

    /// Owning customer's share handle; None for pool entries
    pub management_site_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
