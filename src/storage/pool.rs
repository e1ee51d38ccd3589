//! Database connection pool management.
//!
//! This module builds the process-wide connection pool and wraps it in the
//! matching [`RecordSource`]:
//! - `mysql://` URLs get a MySQL pool (the production store)
//! - `sqlite:` URLs get a read-only SQLite pool (local extracts)

use std::str::FromStr;
use std::sync::Arc;

use log::{error, info};
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::config::DatabaseTarget;
use crate::error_handling::DatabaseError;
use crate::export::{MySqlSource, RecordSource, SqliteSource};

/// Initializes a MySQL connection pool.
pub async fn init_mysql_pool(
    options: MySqlConnectOptions,
    max_connections: u32,
) -> Result<MySqlPool, DatabaseError> {
    MySqlPoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .map_err(|e| {
            error!("Failed to connect to MySQL: {e}");
            DatabaseError::SqlError(e)
        })
}

/// Initializes a read-only SQLite connection pool.
///
/// The database file must already exist; nothing is created or migrated.
pub async fn init_sqlite_pool(
    url: &str,
    max_connections: u32,
) -> Result<SqlitePool, DatabaseError> {
    let options = SqliteConnectOptions::from_str(url)
        .map_err(DatabaseError::SqlError)?
        .read_only(true);

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .map_err(|e| {
            error!("Failed to open SQLite database: {e}");
            DatabaseError::SqlError(e)
        })
}

async fn connect_mysql(
    options: MySqlConnectOptions,
    max_connections: u32,
) -> Result<Arc<dyn RecordSource>, DatabaseError> {
    let pool = init_mysql_pool(options, max_connections).await?;
    info!("Connected to MySQL (max {} connections)", max_connections);
    Ok(Arc::new(MySqlSource::new(pool)))
}

/// Connects to `target` and returns a record source over the new pool.
///
/// URLs are dispatched on their scheme: `mysql`/`mariadb` or `sqlite`.
pub async fn connect_source(
    target: &DatabaseTarget,
    max_connections: u32,
) -> Result<Arc<dyn RecordSource>, DatabaseError> {
    let url = match target {
        DatabaseTarget::MySql(options) => {
            return connect_mysql(options.clone(), max_connections).await;
        }
        DatabaseTarget::Url(url) => url.as_str(),
    };

    let scheme = url.split(':').next().unwrap_or_default();
    match scheme {
        "mysql" | "mariadb" => {
            let options = MySqlConnectOptions::from_str(url).map_err(DatabaseError::SqlError)?;
            connect_mysql(options, max_connections).await
        }
        "sqlite" => {
            let pool = init_sqlite_pool(url, max_connections).await?;
            info!("Opened SQLite database (read-only)");
            Ok(Arc::new(SqliteSource::new(pool)))
        }
        other => Err(DatabaseError::UnsupportedScheme(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(text: &str) -> DatabaseTarget {
        DatabaseTarget::Url(text.to_string())
    }

    #[tokio::test]
    async fn test_unsupported_scheme() {
        let err = match connect_source(&url("postgres://localhost/ads"), 1).await {
            Err(e) => e,
            Ok(_) => panic!("postgres URLs are not supported"),
        };
        assert!(matches!(err, DatabaseError::UnsupportedScheme(ref s) if s == "postgres"));
    }

    #[tokio::test]
    async fn test_sqlite_missing_file_is_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = url(&format!("sqlite:{}", dir.path().join("absent.db").display()));
        let result = connect_source(&target, 1).await;
        assert!(matches!(result, Err(DatabaseError::SqlError(_))));
    }

    #[tokio::test]
    async fn test_unparseable_mysql_url_is_error() {
        // An unescaped '#' in the password truncates the URL before the port
        let target = url("mysql://exporter:pa#ss/word@db.internal:3306/ads");
        let result = connect_source(&target, 1).await;
        assert!(matches!(result, Err(DatabaseError::SqlError(_))));
    }
}
