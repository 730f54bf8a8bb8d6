//! Server configuration
//!
//! Sources, later ones winning:
//! 1. `{config_dir}/default.toml`
//! 2. `{config_dir}/{environment}.toml`
//! 3. `LAND_REGISTRY__SECTION__KEY` environment variables
//! 4. command-line flags (applied in `main`)
//!
//! Every field has a default, so an empty config directory yields a server
//! on port 8000 backed by `land_registry.db`.

use config::{Config, ConfigError, Environment, File};
use land_registry_db::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_DATABASE_URL, DEFAULT_IDLE_TIMEOUT_SECS,
    DEFAULT_MAX_CONNECTIONS, DEFAULT_MAX_LIFETIME_SECS, DEFAULT_MIN_CONNECTIONS,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "LAND_REGISTRY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server: HttpServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,

    /// Drain in-flight requests on Ctrl+C / SIGTERM
    pub graceful_shutdown: bool,

    /// Upper bound on waiting for the database to close after serving stops
    pub shutdown_timeout_seconds: u64,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            graceful_shutdown: true,
            shutdown_timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `sqlite://path.db` or `sqlite::memory:`
    pub url: String,
    pub min_connections: u32,
    pub max_connections: u32,
    pub connect_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
    pub max_lifetime_seconds: u64,
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            min_connections: DEFAULT_MIN_CONNECTIONS,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connect_timeout_seconds: DEFAULT_CONNECT_TIMEOUT_SECS,
            idle_timeout_seconds: DEFAULT_IDLE_TIMEOUT_SECS,
            max_lifetime_seconds: DEFAULT_MAX_LIFETIME_SECS,
            run_migrations: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `land_registry_db=debug,info`
    pub level: String,
    pub json_format: bool,
    pub include_timestamps: bool,
    pub include_thread_ids: bool,
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            include_timestamps: true,
            include_thread_ids: false,
            include_target: true,
        }
    }
}

impl LoggingConfig {
    /// SQL statements are only logged at debug verbosity or finer
    pub fn logs_statements(&self) -> bool {
        matches!(self.level.as_str(), "debug" | "trace")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Empty allows any origin
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
    pub max_age_seconds: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            allow_credentials: false,
            max_age_seconds: 3600,
        }
    }
}

impl From<CorsConfig> for land_registry_api::CorsConfig {
    fn from(config: CorsConfig) -> Self {
        Self {
            allowed_origins: config.allowed_origins,
            allow_credentials: config.allow_credentials,
            max_age_seconds: Some(config.max_age_seconds),
        }
    }
}

impl ServerConfig {
    /// Merge config files and environment variables
    ///
    /// Missing files are skipped. A file that exists but does not parse, or
    /// a value of the wrong type, is an error.
    pub fn load(config_dir: impl Into<PathBuf>, environment: &str) -> Result<Self, ConfigError> {
        let config_dir = config_dir.into();

        Config::builder()
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(
                File::from(config_dir.join(format!("{}.toml", environment))).required(false),
            )
            // LAND_REGISTRY__SERVER__PORT=8080
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
