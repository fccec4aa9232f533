//! Items module.
//!
//! This module handles:
//! - The `Item` record and request/response payloads
//! - The `ItemStore` seam handlers talk to
//! - MySQL-backed and in-memory store implementations

pub mod mock;
pub mod store;
pub mod types;

pub use mock::MockItemStore;
pub use store::{ItemStore, MySqlItemStore};
pub use types::{CreateItemRequest, CreateItemResponse, Item, NewItem};
