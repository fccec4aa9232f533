//! Idempotent schema creation run once at startup.

use tracing::{error, info, instrument};

use crate::error::DbError;
use crate::metrics;

use super::pool::Database;

/// DDL for the `items` table.
pub const CREATE_ITEMS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS items (
        id INT AUTO_INCREMENT PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
"#;

/// Create the `items` table if it does not exist yet.
///
/// Holds a single connection for the duration of the statement.
#[instrument(skip(db))]
pub async fn initialize_schema(db: &Database) -> Result<(), DbError> {
    let mut conn = db.acquire().await?;

    sqlx::query(CREATE_ITEMS_TABLE)
        .execute(&mut *conn)
        .await
        .map_err(DbError::from_query)?;

    Ok(())
}

/// Run [`initialize_schema`], logging the outcome instead of failing.
///
/// Returns whether the table is known to exist.
pub async fn run_schema_initializer(db: &Database) -> bool {
    match initialize_schema(db).await {
        Ok(()) => {
            info!("Database initialized successfully");
            true
        }
        Err(e) => {
            error!(error = %e, "Error initializing database");
            metrics::inc_schema_init_failures();
            false
        }
    }
}
