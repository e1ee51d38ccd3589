//! Bulk ID-based export.
//!
//! This module turns a list of record identifiers into CSV text: the ids are
//! split into bounded batches, each batch is looked up with one
//! parameterized query, the rows are decoded and enriched (dates, derived
//! URL), and the merged result is serialized with a labelled header.

mod csv;
mod pipeline;
mod profile;
mod queries;
mod row;
mod source;
mod types;

pub use self::csv::write_csv;
pub use pipeline::ExportPipeline;
pub use profile::{ColumnKind, ColumnSpec, DerivedColumn, ExportProfile, JoinSpec};
pub use source::{MySqlSource, RecordSource, SqliteSource};
pub use types::{ExportRequest, ExportResult, Identifier, Record, Value};
