//! HTTP handlers.

mod export;
mod status;

pub use export::export_handler;
pub use status::status_handler;
