//! # Repository Layer
//!
//! This module contains repository implementations that encapsulate SeaORM
//! operations for database entities, providing a clean API for data access.

pub mod board;
pub mod customer;
pub mod employee;
pub mod guarantee;
pub mod team;

pub use board::{BoardEntry, BoardFilter, BoardKind, BoardRepository};
pub use customer::CustomerRepository;
pub use employee::EmployeeRepository;
pub use guarantee::GuaranteeCatalog;
pub use team::TeamRepository;
