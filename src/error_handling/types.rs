//! Error type definitions.
//!
//! This module defines the error types used throughout the application.

use axum::http::StatusCode;
use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// The export profile could not be read or failed validation.
    #[error("Export profile error: {0}")]
    ProfileError(String),

    /// The database connection settings are incomplete.
    #[error("Database configuration error: {0}")]
    DatabaseConfigError(String),
}

/// Error types for database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// The connection URL uses a scheme we have no driver for.
    #[error("Unsupported database URL scheme: {0}")]
    UnsupportedScheme(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),
}

/// Failures of a single export request.
///
/// Each variant maps to one HTTP status. The upstream cause is kept for
/// logging only and is never sent back to the caller.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The request carried no identifiers.
    #[error("No IDs provided")]
    InvalidRequest,

    /// The request was well formed but no rows matched.
    #[error("No ads found")]
    NotFound,

    /// The data store failed while running a batch.
    #[error("Upstream data store failure: {0}")]
    UpstreamFailure(#[from] sqlx::Error),

    /// The fetched rows could not be written as CSV.
    #[error("CSV serialization failure: {0}")]
    Serialization(#[from] csv::Error),
}

impl ExportError {
    /// HTTP status the failure is surfaced as.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ExportError::InvalidRequest => StatusCode::BAD_REQUEST,
            ExportError::NotFound => StatusCode::NOT_FOUND,
            ExportError::UpstreamFailure(_) | ExportError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to return to the caller.
    pub fn public_message(&self) -> &'static str {
        match self {
            ExportError::InvalidRequest => "No IDs provided",
            ExportError::NotFound => "No ads found",
            ExportError::UpstreamFailure(_) | ExportError::Serialization(_) => {
                "Failed to generate CSV"
            }
        }
    }

    /// Counter bucket for the status endpoint.
    pub fn kind(&self) -> ExportErrorKind {
        match self {
            ExportError::InvalidRequest => ExportErrorKind::InvalidRequest,
            ExportError::NotFound => ExportErrorKind::NotFound,
            ExportError::UpstreamFailure(_) => ExportErrorKind::UpstreamFailure,
            ExportError::Serialization(_) => ExportErrorKind::Serialization,
        }
    }
}

/// Categories of export failures tracked by [`super::ExportStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ExportErrorKind {
    InvalidRequest,
    NotFound,
    UpstreamFailure,
    Serialization,
}

impl std::fmt::Display for ExportErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ExportErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportErrorKind::InvalidRequest => "invalid_request",
            ExportErrorKind::NotFound => "not_found",
            ExportErrorKind::UpstreamFailure => "upstream_failure",
            ExportErrorKind::Serialization => "serialization",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            ExportError::InvalidRequest.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ExportError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ExportError::UpstreamFailure(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_upstream_cause_not_in_public_message() {
        let err = ExportError::UpstreamFailure(sqlx::Error::Protocol(
            "password=hunter2".to_string(),
        ));
        assert_eq!(err.public_message(), "Failed to generate CSV");
        // The cause is still available for logging
        assert!(err.to_string().contains("hunter2"));
    }

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ExportErrorKind::NotFound.to_string(), "not_found");
        assert_eq!(
            ExportError::InvalidRequest.kind(),
            ExportErrorKind::InvalidRequest
        );
    }
}
