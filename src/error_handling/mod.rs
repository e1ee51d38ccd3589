//! Error handling and export statistics.
//!
//! This module provides:
//! - Error type definitions (request, database and initialization errors)
//! - Export statistics tracking (completed exports, rows, failures by kind)

mod stats;
mod types;

// Re-export public API
pub use stats::ExportStats;
pub use types::{DatabaseError, ExportError, ExportErrorKind, InitializationError};
