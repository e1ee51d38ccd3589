//! ad_export library: CSV export of ad records selected by id
//!
//! This library serves one HTTP operation: given a list of record ids, look
//! the records up in batches (joined to their funder and page), format the
//! dates in UTC, and return the rows as a CSV attachment.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use ad_export::export::{ExportPipeline, ExportProfile, Identifier, SqliteSource};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = ad_export::storage::init_sqlite_pool("sqlite:./ads.db", 4).await?;
//! let pipeline = ExportPipeline::new(Arc::new(SqliteSource::new(pool)), ExportProfile::ads());
//!
//! let csv = pipeline.export(&[Identifier::Int(101), Identifier::Int(205)]).await?;
//! print!("{}", csv);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime.

pub mod config;
mod error_handling;
pub mod export;
pub mod initialization;
pub mod server;
pub mod storage;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use error_handling::{
    DatabaseError, ExportError, ExportErrorKind, ExportStats, InitializationError,
};
pub use run::run_server;

mod run {
    use anyhow::{Context, Result};
    use log::info;

    use crate::config::Config;
    use crate::initialization::init_pipeline;
    use crate::server::{start_server, AppState};

    /// Builds the export pipeline from `config` and serves it until Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile is invalid, the database is
    /// unreachable, or the listen address cannot be bound.
    pub async fn run_server(config: Config) -> Result<()> {
        let pipeline = init_pipeline(&config)
            .await
            .context("Failed to initialize export pipeline")?;

        info!(
            "Export pipeline ready (batch size {}, {} batch(es) in flight)",
            pipeline.batch_size(),
            pipeline.batch_concurrency()
        );

        start_server(&config.bind, AppState::new(pipeline)).await
    }
}
