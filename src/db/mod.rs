//! Database module.
//!
//! This module handles:
//! - The MySQL connection pool adapter
//! - Idempotent schema creation at startup

pub mod pool;
pub mod schema;

pub use pool::{Database, ExecOutcome, SqlParam};
pub use schema::{initialize_schema, run_schema_initializer, CREATE_ITEMS_TABLE};
