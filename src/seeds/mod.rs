//! Database seeding functionality
//!
//! This module provides functionality to seed the database with initial data:
//! the protected teams and the single default customer-info row.

pub mod bootstrap;

pub use bootstrap::seed_database;
