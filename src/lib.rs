//! Minimal items HTTP service backed by a MySQL connection pool.
//!
//! Exposes a greeting at `/`, `POST /items` to create a named item and
//! `GET /items` to list them. Items live in a single `items` table created
//! at startup if missing.
//!
//! ```text
//! POST /items {"name":"apple"}  ->  201 {"message":"Item created successfully","id":1}
//! GET  /items                   ->  200 [{"id":1,"name":"apple","created_at":"..."}]
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`db`]: Connection pool adapter and schema initializer
//! - [`items`]: Item types and stores
//! - [`api`]: HTTP handlers, routes and error mapping
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod items;
pub mod metrics;
pub mod utils;

pub use config::Config;
pub use error::{Result, ServiceError};
