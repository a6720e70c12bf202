//! Customer entity model
//!
//! One row per managed customer. `management_site_id` is the opaque 8-hex
//! handle that anonymous customers use to reach their link boards; it stands
//! in for any other credential on the customer-facing endpoints.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;

/// Customer record managed by an employee
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "employee_customers")]
pub struct Model {
    /// Unique identifier for the customer (primary key)
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Opaque share handle for the customer's link boards (8 lowercase hex)
    pub management_site_id: String,

    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub inquiry_date: Option<String>,
    pub move_in_date: Option<String>,

    /// Budget in 만원; None when the submitted value was not numeric
    pub budget: Option<i64>,

    pub rooms: Option<String>,
    pub location: Option<String>,
    pub loan_needed: Option<String>,
    pub parking_needed: Option<String>,
    pub pets: Option<String>,
    pub memo: Option<String>,

    /// Workflow status, defaults to `진행중`
    pub progress_status: String,

    /// Owning employee
    pub employee_id: i32,
    pub employee_name: String,
    pub employee_team: String,

    pub created_date: DateTimeWithTimeZone,
    pub updated_date: Option<DateTimeWithTimeZone>,

    /// Cached count of liked-but-unacknowledged residential board entries
    pub unchecked_likes_residence: i32,

    /// Cached count of liked-but-unacknowledged commercial board entries
    pub unchecked_likes_business: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
