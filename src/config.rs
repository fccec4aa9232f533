//! Application configuration loaded from environment variables.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use sqlx::mysql::MySqlConnectOptions;

/// Application configuration loaded from environment variables.
#[derive(Clone, Deserialize)]
pub struct Config {
    // === MySQL Connection ===
    /// Database host.
    #[serde(default = "default_mysql_host")]
    pub mysql_host: String,

    /// Database port.
    #[serde(default = "default_mysql_port")]
    pub mysql_port: u16,

    /// Database user.
    #[serde(default = "default_mysql_user")]
    pub mysql_user: String,

    /// Database password.
    #[serde(default = "default_mysql_password")]
    pub mysql_password: String,

    /// Database (schema) name.
    #[serde(default = "default_mysql_database")]
    pub mysql_database: String,

    // === Pool ===
    /// Maximum number of pooled connections.
    #[serde(default = "default_max_connections")]
    pub db_max_connections: u32,

    /// Seconds to wait for a free connection before giving up.
    #[serde(default = "default_acquire_timeout")]
    pub db_acquire_timeout_secs: u64,

    // === Server Configuration ===
    /// HTTP listening port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,
}

fn default_mysql_host() -> String {
    "localhost".to_string()
}

fn default_mysql_port() -> u16 {
    3306
}

fn default_mysql_user() -> String {
    "user".to_string()
}

fn default_mysql_password() -> String {
    "password".to_string()
}

fn default_mysql_database() -> String {
    "mydatabase".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_acquire_timeout() -> u64 {
    10
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mysql_host: default_mysql_host(),
            mysql_port: default_mysql_port(),
            mysql_user: default_mysql_user(),
            mysql_password: default_mysql_password(),
            mysql_database: default_mysql_database(),
            db_max_connections: default_max_connections(),
            db_acquire_timeout_secs: default_acquire_timeout(),
            port: default_port(),
            rust_log: default_log_level(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("mysql_host", &self.mysql_host)
            .field("mysql_port", &self.mysql_port)
            .field("mysql_user", &self.mysql_user)
            .field("mysql_password", &"<redacted>")
            .field("mysql_database", &self.mysql_database)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("port", &self.port)
            .field("rust_log", &self.rust_log)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.mysql_host.is_empty() {
            return Err("MYSQL_HOST must not be empty".to_string());
        }

        if self.mysql_user.is_empty() {
            return Err("MYSQL_USER must not be empty".to_string());
        }

        if self.mysql_database.is_empty() {
            return Err("MYSQL_DATABASE must not be empty".to_string());
        }

        if self.db_max_connections == 0 {
            return Err("DB_MAX_CONNECTIONS must be at least 1".to_string());
        }

        if self.port == 0 {
            return Err("PORT must be non-zero".to_string());
        }

        Ok(())
    }

    /// Connection options for the MySQL driver.
    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.mysql_host)
            .port(self.mysql_port)
            .username(&self.mysql_user)
            .password(&self.mysql_password)
            .database(&self.mysql_database)
    }

    /// How long an acquire may wait on the pool.
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.db_acquire_timeout_secs)
    }
}
