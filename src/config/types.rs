//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration. Every option can also be supplied through the
//! environment (and therefore through a `.env` file).

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use sqlx::mysql::MySqlConnectOptions;

use crate::config::constants::{
    BATCH_SIZE, DEFAULT_BATCH_CONCURRENCY, DEFAULT_BIND_ADDR, DEFAULT_DATABASE_PORT,
    DEFAULT_MAX_CONNECTIONS,
};
use crate::error_handling::InitializationError;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Service configuration.
///
/// Parsed from command-line flags with environment fallbacks.
///
/// # Examples
///
/// ```bash
/// # Full connection URL
/// ad_export --database-url mysql://user:pass@db:3306/ads
///
/// # Discrete settings, as found in a .env file
/// DATABASE_HOST=db DATABASE_USER=app DATABASE_PASSWORD=secret DATABASE_NAME=ads ad_export
///
/// # Local SQLite file with a custom column profile
/// ad_export --database-url sqlite:./ads.db --profile ./profiles/ads_labels.json
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ad_export",
    about = "Serves CSV exports of ad records selected by id."
)]
pub struct Config {
    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Address the HTTP server listens on
    #[arg(long, env = "AD_EXPORT_BIND", default_value = DEFAULT_BIND_ADDR)]
    pub bind: String,

    /// Full database URL (mysql://... or sqlite:...).
    /// Takes precedence over the DATABASE_HOST/... settings.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// MySQL host, used when no database URL is given
    #[arg(long, env = "DATABASE_HOST")]
    pub database_host: Option<String>,

    /// MySQL port
    #[arg(long, env = "DATABASE_PORT", default_value_t = DEFAULT_DATABASE_PORT)]
    pub database_port: u16,

    /// MySQL user
    #[arg(long, env = "DATABASE_USER")]
    pub database_user: Option<String>,

    /// MySQL password
    #[arg(long, env = "DATABASE_PASSWORD", hide_env_values = true)]
    pub database_password: Option<String>,

    /// MySQL schema name
    #[arg(long, env = "DATABASE_NAME")]
    pub database_name: Option<String>,

    /// Maximum pooled database connections
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Identifiers per lookup query
    #[arg(long, default_value_t = BATCH_SIZE)]
    pub batch_size: usize,

    /// Batches allowed in flight per request (1 = sequential)
    #[arg(long, default_value_t = DEFAULT_BATCH_CONCURRENCY)]
    pub batch_concurrency: usize,

    /// JSON file describing the exported columns (defaults to the built-in ads profile)
    #[arg(long, env = "AD_EXPORT_PROFILE")]
    pub profile: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            bind: DEFAULT_BIND_ADDR.to_string(),
            database_url: None,
            database_host: None,
            database_port: DEFAULT_DATABASE_PORT,
            database_user: None,
            database_password: None,
            database_name: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            batch_size: BATCH_SIZE,
            batch_concurrency: DEFAULT_BATCH_CONCURRENCY,
            profile: None,
        }
    }
}

/// Where the export reads from.
#[derive(Debug, Clone)]
pub enum DatabaseTarget {
    /// A full URL whose scheme picks the store (`mysql://`, `sqlite:`)
    Url(String),
    /// MySQL settings given one by one; never rendered into a URL
    MySql(MySqlConnectOptions),
}

impl Config {
    /// Resolves the database to connect to.
    ///
    /// An explicit `database_url` wins. Otherwise MySQL connect options are
    /// built from host, port, user, password and schema name; host, user and
    /// name are required in that case. The values are passed to the driver
    /// verbatim, so passwords may contain URL-reserved characters.
    pub fn database_target(&self) -> Result<DatabaseTarget, InitializationError> {
        if let Some(url) = &self.database_url {
            return Ok(DatabaseTarget::Url(url.clone()));
        }

        let missing = |name: &str| {
            InitializationError::DatabaseConfigError(format!(
                "{} is not set and no DATABASE_URL was given",
                name
            ))
        };
        let host = self
            .database_host
            .as_deref()
            .ok_or_else(|| missing("DATABASE_HOST"))?;
        let user = self
            .database_user
            .as_deref()
            .ok_or_else(|| missing("DATABASE_USER"))?;
        let name = self
            .database_name
            .as_deref()
            .ok_or_else(|| missing("DATABASE_NAME"))?;

        let mut options = MySqlConnectOptions::new()
            .host(host)
            .port(self.database_port)
            .username(user)
            .database(name);
        if let Some(password) = self.database_password.as_deref().filter(|p| !p.is_empty()) {
            options = options.password(password);
        }

        Ok(DatabaseTarget::MySql(options))
    }
}
