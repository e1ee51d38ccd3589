// storage/mod.rs
// Database connection setup

pub mod pool;

// Re-export commonly used items
pub use pool::{connect_source, init_mysql_pool, init_sqlite_pool};
