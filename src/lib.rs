//! # Back Office API Library
//!
//! This library provides the core functionality for the agency back office,
//! including handlers, models, repositories and server configuration.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod ident;
pub mod models;
pub mod repositories;
pub mod seeds;
pub mod server;
pub mod session;
pub mod telemetry;
pub use migration;
