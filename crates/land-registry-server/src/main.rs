//! Land Registry Server
//!
//! Opens the registry database, wires the services and serves the HTTP API
//! until Ctrl+C or SIGTERM.

mod config;
mod telemetry;

use anyhow::{Context, Result};
use clap::Parser;
use land_registry_api::{build_api_server_with_config, MiddlewareConfig};
use land_registry_db::{close_pool, create_pool, PoolConfig, SqlitePool, SqliteRegistryRepository};
use land_registry_service::ServiceRegistry;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{info, warn};

use config::ServerConfig;

/// Land Truth Registry HTTP server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding default.toml and {environment}.toml
    #[arg(short, long, env = "CONFIG_DIR", default_value = "config")]
    config_dir: String,

    /// Name of the environment file to layer over default.toml
    #[arg(short, long, env = "ENVIRONMENT", default_value = "development")]
    environment: String,

    #[arg(long, env = "SERVER_HOST")]
    host: Option<String>,

    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// e.g. sqlite://land_registry.db or sqlite::memory:
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[arg(long, env = "RUST_LOG")]
    log_level: Option<String>,
}

impl Args {
    /// Flags win over files and `LAND_REGISTRY__*` variables
    fn apply_overrides(self, config: &mut ServerConfig) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(url) = self.database_url {
            config.database.url = url;
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let environment = args.environment.clone();

    let mut config = ServerConfig::load(&args.config_dir, &environment).with_context(|| {
        format!(
            "Failed to load configuration from {} ({})",
            args.config_dir, environment
        )
    })?;
    args.apply_overrides(&mut config);

    telemetry::init_with_config(telemetry::TelemetryConfig::from(&config.logging))
        .context("Failed to initialize logging")?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %environment,
        database = %config.database.url,
        "Starting Land Registry Server"
    );

    let pool = setup_database(&config).await?;
    let services = ServiceRegistry::new(Arc::new(SqliteRegistryRepository::new(pool.clone())));

    let app = build_api_server_with_config(
        services,
        MiddlewareConfig::new().with_cors(config.cors.clone().into()),
    );

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .context("Invalid HTTP bind address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Listening on http://{}", addr);

    let serve = axum::serve(listener, app.into_make_service());
    if config.server.graceful_shutdown {
        serve
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server error")?;
    } else {
        serve.await.context("HTTP server error")?;
    }

    let timeout = Duration::from_secs(config.server.shutdown_timeout_seconds);
    if tokio::time::timeout(timeout, close_pool(pool)).await.is_err() {
        warn!(
            "Database did not close within {}s, exiting anyway",
            timeout.as_secs()
        );
    }

    info!("Server stopped");
    Ok(())
}

/// Open the registry database described by `config.database`
async fn setup_database(config: &ServerConfig) -> Result<SqlitePool> {
    let db = &config.database;
    let mut pool_config = PoolConfig::new(&db.url)
        .min_connections(db.min_connections)
        .max_connections(db.max_connections)
        .connect_timeout(Duration::from_secs(db.connect_timeout_seconds))
        .idle_timeout(Duration::from_secs(db.idle_timeout_seconds))
        .max_lifetime(Duration::from_secs(db.max_lifetime_seconds))
        .run_migrations(db.run_migrations)
        .enable_logging(config.logging.logs_statements());

    if pool_config.is_in_memory() {
        warn!("In-memory database: all records are lost on shutdown");
        pool_config = pool_config.min_connections(1).max_connections(1);
    }

    create_pool(&pool_config)
        .await
        .context("Failed to open the registry database")
}

/// Resolves on the first of Ctrl+C or SIGTERM
///
/// A signal whose handler cannot be installed is logged and never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, draining connections"),
        _ = terminate => info!("Received SIGTERM, draining connections"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = Args::try_parse_from([
            "land-registry-server",
            "--config-dir",
            "/etc/land-registry",
            "--environment",
            "production",
            "--port",
            "9090",
            "--database-url",
            "sqlite::memory:",
        ])
        .unwrap();
        assert_eq!(args.config_dir, "/etc/land-registry");
        assert_eq!(args.environment, "production");

        let mut config = ServerConfig::default();
        args.apply_overrides(&mut config);

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.url, "sqlite::memory:");
    }

    #[tokio::test]
    async fn test_setup_in_memory_database() {
        let mut config = ServerConfig::default();
        config.database.url = "sqlite::memory:".to_string();
        config.database.max_connections = 8;

        let pool = setup_database(&config).await.unwrap();
        assert_eq!(pool.options().get_max_connections(), 1);
        close_pool(pool).await;
    }
}
