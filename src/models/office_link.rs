//! Commercial board entry model
//!
//! Same shape as the residential board but kept as its own table so the two
//! boards never mix entries or counters.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "office_links")]
pub struct Model {
    /// Unique identifier for the entry (primary key)
    #[sea_orm(primary_key)]
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

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
