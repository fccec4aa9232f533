//! Items service entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use items_service::api::{create_router, AppState};
use items_service::config::Config;
use items_service::db::{initialize_schema, run_schema_initializer, Database};
use items_service::error::ServiceError;
use items_service::items::MySqlItemStore;
use items_service::metrics;
use items_service::utils::shutdown_signal;

/// Minimal items HTTP service backed by MySQL.
#[derive(Parser, Debug)]
#[command(name = "items-service")]
#[command(about = "Create and list items over HTTP, stored in MySQL")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines.
    #[arg(long, global = true, env = "LOG_JSON")]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP listening port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve {
        /// HTTP listening port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Create the items table and exit.
    InitDb,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("items_service=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    if args.json_logs {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }

    // Handle subcommands
    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(),
        Some(Command::InitDb) => cmd_init_db().await,
        Some(Command::Serve { port }) => cmd_serve(port.or(args.port)).await,
        None => cmd_serve(args.port).await,
    }
}

/// Load and validate configuration from the environment.
fn load_config(port_override: Option<u16>) -> Result<Config, ServiceError> {
    let mut config = Config::load()?;

    if let Some(port) = port_override {
        config.port = port;
    }

    config.validate().map_err(ServiceError::InvalidConfig)?;
    Ok(config)
}

/// Check configuration validity.
fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("ITEMS SERVICE - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  MySQL Host: {}:{}", config.mysql_host, config.mysql_port);
    println!("  MySQL User: {}", config.mysql_user);
    println!("  MySQL Password: <redacted>");
    println!("  MySQL Database: {}", config.mysql_database);
    println!("  Pool Size: {}", config.db_max_connections);
    println!("  Acquire Timeout: {}s", config.db_acquire_timeout_secs);
    println!("  HTTP Port: {}", config.port);
    println!("  Log Level: {}", config.rust_log);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Create the items table and exit.
async fn cmd_init_db() -> anyhow::Result<()> {
    let config = load_config(None)?;
    let db = Database::connect_lazy(&config);

    let result = initialize_schema(&db).await;
    db.close().await;

    match result {
        Ok(()) => {
            info!("Database initialized successfully");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Error initializing database");
            Err(ServiceError::from(e).into())
        }
    }
}

/// Run the HTTP server.
async fn cmd_serve(port_override: Option<u16>) -> anyhow::Result<()> {
    info!("Loading configuration...");
    let config = load_config(port_override).map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;
    info!(
        host = %config.mysql_host,
        database = %config.mysql_database,
        port = config.port,
        "Configuration loaded"
    );

    // Initialize metrics
    let prometheus = match metrics::install_prometheus_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!(error = %e, "Prometheus recorder unavailable, /metrics disabled");
            None
        }
    };
    metrics::init_metrics();

    let db = Database::connect_lazy(&config);

    // Schema creation finishes (or fails) before the listener opens.
    let schema_initialized = run_schema_initializer(&db).await;

    let mut app_state = AppState::new(Arc::new(MySqlItemStore::new(db.clone())));
    if let Some(handle) = prometheus {
        app_state = app_state.with_prometheus(handle);
    }
    app_state.set_schema_initialized(schema_initialized);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await.map_err(ServiceError::from)?;
    info!("Server running at http://localhost:{}", config.port);

    axum::serve(listener, create_router(app_state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServiceError::from)?;

    db.close().await;
    info!("Server stopped");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults_to_serve_without_port_override() {
        let args = Args::try_parse_from(["items-service"]).unwrap();
        assert!(args.command.is_none());
        assert!(args.port.is_none());
    }

    #[test]
    fn cli_parses_serve_port() {
        let args = Args::try_parse_from(["items-service", "serve", "--port", "8081"]).unwrap();
        match args.command {
            Some(Command::Serve { port }) => assert_eq!(port, Some(8081)),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn cli_parses_init_db() {
        let args = Args::try_parse_from(["items-service", "init-db"]).unwrap();
        assert!(matches!(args.command, Some(Command::InitDb)));
    }
}
