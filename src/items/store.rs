//! The item store seam and its MySQL implementation.

use async_trait::async_trait;
use sqlx::FromRow;
use tracing::{debug, instrument};

use crate::db::{Database, SqlParam};
use crate::error::DbError;

use super::types::{Item, NewItem};

const INSERT_ITEM: &str = "INSERT INTO items (name) VALUES (?)";
const SELECT_ITEMS: &str = "SELECT id, name, created_at FROM items ORDER BY id";

/// Persistence operations the HTTP layer needs.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Insert an item and return its generated id.
    async fn create(&self, item: &NewItem) -> Result<u64, DbError>;

    /// Every stored item.
    async fn list(&self) -> Result<Vec<Item>, DbError>;

    /// Check the backing database is reachable.
    async fn ping(&self) -> Result<(), DbError>;
}

/// [`ItemStore`] backed by the MySQL pool.
#[derive(Debug, Clone)]
pub struct MySqlItemStore {
    db: Database,
}

impl MySqlItemStore {
    /// Create a store over a pool handle.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// The pool this store uses.
    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl ItemStore for MySqlItemStore {
    #[instrument(skip(self, item), fields(name = %item.name()))]
    async fn create(&self, item: &NewItem) -> Result<u64, DbError> {
        let outcome = self
            .db
            .execute(INSERT_ITEM, &[SqlParam::from(item.name())])
            .await?;

        debug!(id = outcome.last_insert_id, "Item inserted");
        Ok(outcome.last_insert_id)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Item>, DbError> {
        let rows = self.db.fetch(SELECT_ITEMS, &[]).await?;

        rows.iter()
            .map(|row| Item::from_row(row).map_err(DbError::Query))
            .collect()
    }

    async fn ping(&self) -> Result<(), DbError> {
        self.db.ping().await
    }
}
