//! Guarantee-insurance click log model

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;

/// One row per customer click on a guarantee-insurance badge
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "guarantee_insurance_log")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Share handle of the board the click came from, when known
    pub management_site_id: Option<String>,

    /// Board entry the badge belonged to
    pub link_id: i32,

    pub click_time: DateTimeWithTimeZone,

    pub user_ip: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
