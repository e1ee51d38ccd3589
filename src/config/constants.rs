//! Configuration constants.
//!
//! This module defines the constants used as defaults throughout the
//! application: batch sizing, pool limits, placeholders and templates.

/// Maximum number of identifiers bound into a single lookup query.
/// Keeps each statement well below the store's placeholder limit
/// (65,535 on MySQL, 32,766 on SQLite >= 3.32).
pub const BATCH_SIZE: usize = 4000;

/// Number of batches allowed in flight at once for one request.
/// 1 runs batches strictly one after another.
pub const DEFAULT_BATCH_CONCURRENCY: usize = 1;

/// Maximum pooled database connections
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Default MySQL port when assembling a URL from discrete settings
pub const DEFAULT_DATABASE_PORT: u16 = 3306;

/// Default listen address for the HTTP server
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Route of the export endpoint
pub const EXPORT_ROUTE: &str = "/api/export-ads";

/// Route of the JSON status endpoint
pub const STATUS_ROUTE: &str = "/status";

/// Rendered output format for every date-time column (always UTC)
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Substituted for a missing funder or page name
pub const UNKNOWN_NAME: &str = "Unknown";

/// Substituted for a null date column
pub const MISSING_DATE_PLACEHOLDER: &str = "N/A";

/// Public detail page of an ad; `{id}` is replaced by the record id
pub const AD_URL_TEMPLATE: &str = "https://www.facebook.com/ads/library/?id={id}";

/// Placeholder token inside derived-column templates
pub const ID_TEMPLATE_TOKEN: &str = "{id}";

/// Statement that pins a MySQL session to UTC
pub const SET_UTC_TIME_ZONE: &str = "SET time_zone = '+00:00'";
