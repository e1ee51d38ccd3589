//! Application initialization and resource setup.
//!
//! This module provides functions to initialize the shared resources:
//! - Logger
//! - Export profile (built-in or loaded from a JSON file)
//! - Record source over the configured database pool
//!
//! All initialization functions return proper error types for error handling.

mod logger;

use std::sync::Arc;

use log::info;

use crate::config::Config;
use crate::error_handling::InitializationError;
use crate::export::{ExportPipeline, ExportProfile, RecordSource};
use crate::storage::connect_source;

// Re-export public API
pub use logger::init_logger_with;

/// Resolves the export profile named by the configuration.
///
/// Falls back to [`ExportProfile::ads`] when no profile file is configured.
pub fn init_profile(config: &Config) -> Result<ExportProfile, InitializationError> {
    match &config.profile {
        Some(path) => {
            let profile = ExportProfile::from_json_file(path)?;
            info!(
                "Loaded export profile from {} ({} columns)",
                path.display(),
                profile.columns.len()
            );
            Ok(profile)
        }
        None => Ok(ExportProfile::ads()),
    }
}

/// Builds the export pipeline: profile, database pool and batching settings.
pub async fn init_pipeline(config: &Config) -> anyhow::Result<ExportPipeline> {
    let profile = init_profile(config)?;
    let target = config.database_target()?;
    let source: Arc<dyn RecordSource> = connect_source(&target, config.max_connections).await?;

    Ok(ExportPipeline::new(source, profile)
        .with_batch_size(config.batch_size)
        .with_batch_concurrency(config.batch_concurrency))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_profile_is_ads() {
        let profile = init_profile(&Config::default()).expect("built-in profile");
        assert_eq!(profile.entity_table, "ads");
        assert_eq!(profile.derived[0].name, "ad_url");
    }

    #[test]
    fn test_profile_loaded_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{
                "entity_table": "ads",
                "id_column": "ads.id",
                "columns": [{{"name": "id", "expr": "ads.id", "kind": "integer"}}],
                "labels": {{"id": "Ad ID"}},
                "filename_prefix": "ad_ids"
            }}"#
        )
        .expect("write profile");

        let config = Config {
            profile: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let profile = init_profile(&config).expect("profile from file");
        assert_eq!(profile.headers(), vec!["Ad ID"]);
        assert_eq!(profile.filename_prefix, "ad_ids");
    }

    #[test]
    fn test_invalid_profile_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"entity_table": "ads", "id_column": "ads.id", "columns": []}}"#)
            .expect("write profile");

        let config = Config {
            profile: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        assert!(matches!(
            init_profile(&config),
            Err(InitializationError::ProfileError(_))
        ));
    }
}
