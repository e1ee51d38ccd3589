//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (batch size, pool limits, templates)
//! - CLI/environment option types and parsing

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, DatabaseTarget, LogFormat, LogLevel};
