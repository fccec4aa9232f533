//! In-memory item store for testing.
//!
//! Behaves like the MySQL store without a database: ids are assigned from an
//! auto-increment counter starting at 1 and `created_at` is stamped on insert.
//! [`MockItemStore::set_unreachable`] makes every call fail with a connection
//! error.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::error::DbError;

use super::store::ItemStore;
use super::types::{Item, NewItem};

#[derive(Debug, Default)]
struct Table {
    rows: Vec<Item>,
    next_id: i32,
}

/// In-memory [`ItemStore`].
#[derive(Debug, Clone, Default)]
pub struct MockItemStore {
    table: Arc<Mutex<Table>>,
    unreachable: Arc<AtomicBool>,
    inserts: Arc<AtomicU64>,
}

impl MockItemStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the database going away (or coming back).
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Number of successful inserts so far.
    pub fn insert_count(&self) -> u64 {
        self.inserts.load(Ordering::SeqCst)
    }

    fn check_reachable(&self) -> Result<(), DbError> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(DbError::Connection(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl ItemStore for MockItemStore {
    async fn create(&self, item: &NewItem) -> Result<u64, DbError> {
        self.check_reachable()?;

        let mut table = self.table.lock().await;
        table.next_id += 1;
        let id = table.next_id;
        table.rows.push(Item {
            id,
            name: item.name().to_string(),
            created_at: Some(Utc::now()),
        });
        self.inserts.fetch_add(1, Ordering::SeqCst);

        Ok(id as u64)
    }

    async fn list(&self) -> Result<Vec<Item>, DbError> {
        self.check_reachable()?;
        Ok(self.table.lock().await.rows.clone())
    }

    async fn ping(&self) -> Result<(), DbError> {
        self.check_reachable()
    }
}
