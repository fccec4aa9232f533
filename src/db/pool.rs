//! MySQL connection pool adapter.
//!
//! Connections are checked out with [`Database::acquire`] and go back to the
//! pool when the returned guard is dropped, so every exit path releases
//! exactly once. [`Database::execute`] and [`Database::fetch`] do the whole
//! acquire/run/release cycle for a single statement.

use sqlx::mysql::{MySqlArguments, MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::pool::PoolConnection;
use sqlx::query::Query;
use sqlx::{Connection, MySql};
use tracing::debug;

use crate::config::Config;
use crate::error::DbError;

/// A positional statement parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    /// Text value.
    Text(String),
    /// Integer value.
    Int(i64),
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        SqlParam::Text(value.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        SqlParam::Text(value)
    }
}

impl From<i64> for SqlParam {
    fn from(value: i64) -> Self {
        SqlParam::Int(value)
    }
}

/// Result of a write statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecOutcome {
    /// Identifier generated by an AUTO_INCREMENT column, 0 if none.
    pub last_insert_id: u64,
    /// Number of rows changed.
    pub rows_affected: u64,
}

/// Shared handle to the MySQL pool. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Database {
    pool: MySqlPool,
}

impl Database {
    /// Build the pool without connecting; the first acquire opens a connection.
    pub fn connect_lazy(config: &Config) -> Self {
        let pool = MySqlPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect_lazy_with(config.connect_options());

        debug!(
            host = %config.mysql_host,
            database = %config.mysql_database,
            max_connections = config.db_max_connections,
            "MySQL pool configured"
        );

        Self { pool }
    }

    /// Check out a connection. Dropping it returns it to the pool.
    pub async fn acquire(&self) -> Result<PoolConnection<MySql>, DbError> {
        self.pool.acquire().await.map_err(DbError::Connection)
    }

    /// Run a write statement and report the generated id.
    pub async fn execute(&self, sql: &str, params: &[SqlParam]) -> Result<ExecOutcome, DbError> {
        let mut conn = self.acquire().await?;
        let result = bind_params(sql, params)
            .execute(&mut *conn)
            .await
            .map_err(DbError::from_query)?;

        Ok(ExecOutcome {
            last_insert_id: result.last_insert_id(),
            rows_affected: result.rows_affected(),
        })
    }

    /// Run a read statement and return every row.
    pub async fn fetch(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<MySqlRow>, DbError> {
        let mut conn = self.acquire().await?;
        bind_params(sql, params)
            .fetch_all(&mut *conn)
            .await
            .map_err(DbError::from_query)
    }

    /// Round-trip a ping on a pooled connection.
    pub async fn ping(&self) -> Result<(), DbError> {
        let mut conn = self.acquire().await?;
        conn.ping().await.map_err(DbError::Connection)
    }

    /// Close every connection and refuse new acquires.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn bind_params<'q>(sql: &'q str, params: &'q [SqlParam]) -> Query<'q, MySql, MySqlArguments> {
    params
        .iter()
        .fold(sqlx::query(sql), |query, param| match param {
            SqlParam::Text(value) => query.bind(value.as_str()),
            SqlParam::Int(value) => query.bind(*value),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_convert_from_common_types() {
        assert_eq!(SqlParam::from("apple"), SqlParam::Text("apple".to_string()));
        assert_eq!(SqlParam::from(String::from("pear")), SqlParam::Text("pear".to_string()));
        assert_eq!(SqlParam::from(7_i64), SqlParam::Int(7));
    }

    #[tokio::test]
    async fn lazy_pool_reports_connection_error_when_unreachable() {
        let config = Config {
            mysql_host: "127.0.0.1".to_string(),
            mysql_port: 1,
            db_acquire_timeout_secs: 1,
            ..Config::default()
        };
        let db = Database::connect_lazy(&config);

        let err = db
            .fetch("SELECT 1", &[])
            .await
            .err()
            .expect("unreachable database must fail");
        assert!(err.is_connection());
    }

    // Integration tests require a real database
    // Run with: MYSQL_HOST=... cargo test -- --ignored

    #[tokio::test]
    #[ignore = "requires MySQL"]
    async fn execute_without_auto_increment_reports_zero_id() {
        let config = Config::load().expect("config");
        let db = Database::connect_lazy(&config);

        let outcome = db
            .execute("SET @items_check = ?", &[SqlParam::Int(1)])
            .await
            .expect("execute failed");
        assert_eq!(outcome.last_insert_id, 0);
    }

    #[tokio::test]
    #[ignore = "requires MySQL"]
    async fn fetch_binds_positional_params() {
        let config = Config::load().expect("config");
        let db = Database::connect_lazy(&config);

        let rows = db
            .fetch("SELECT ? AS n", &[SqlParam::Int(42)])
            .await
            .expect("fetch failed");
        assert_eq!(rows.len(), 1);
    }
}
