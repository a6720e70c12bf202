//! Database migrations for the agency back office.
//!
//! This module contains all database migrations using SeaORM Migration.

pub use sea_orm_migration::prelude::*;

mod m2025_01_10_000001_create_teams;
mod m2025_01_10_000002_create_employees;
mod m2025_01_10_000003_create_customers;
mod m2025_01_10_000004_create_links;
mod m2025_01_10_000005_create_office_links;
mod m2025_01_10_000006_create_guarantee_log;
mod m2025_01_10_000007_create_customer_info;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2025_01_10_000001_create_teams::Migration),
            Box::new(m2025_01_10_000002_create_employees::Migration),
            Box::new(m2025_01_10_000003_create_customers::Migration),
            Box::new(m2025_01_10_000004_create_links::Migration),
            Box::new(m2025_01_10_000005_create_office_links::Migration),
            Box::new(m2025_01_10_000006_create_guarantee_log::Migration),
            Box::new(m2025_01_10_000007_create_customer_info::Migration),
        ]
    }
}
