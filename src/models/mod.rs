//! # Data Models
//!
//! This module contains all the SeaORM entity models used throughout the
//! back office API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod customer;
pub mod customer_info;
pub mod employee;
pub mod guarantee_log;
pub mod link;
pub mod office_link;
pub mod team;

pub use customer::Entity as Customer;
pub use customer_info::Entity as CustomerInfo;
pub use employee::Entity as Employee;
pub use guarantee_log::Entity as GuaranteeLog;
pub use link::Entity as Link;
pub use office_link::Entity as OfficeLink;
pub use team::Entity as Team;

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "backoffice".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
