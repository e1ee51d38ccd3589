//! CSV serialization.
//!
//! Writes the merged export as CSV text: one header row of display labels,
//! then one row per record with the same columns in the same order.

use std::io;

use csv::Writer;

use super::types::ExportResult;

/// Serializes an export result to CSV text.
///
/// Fields a record lacks, and null values, are written as empty fields so
/// every row has exactly `result.fields.len()` columns.
pub fn write_csv(result: &ExportResult) -> Result<String, csv::Error> {
    let mut writer = Writer::from_writer(Vec::new());

    writer.write_record(&result.headers)?;

    let mut row = Vec::with_capacity(result.fields.len());
    for record in &result.records {
        row.clear();
        for field in &result.fields {
            row.push(record.get(field).map(|v| v.to_string()).unwrap_or_default());
        }
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| csv::Error::from(io::Error::new(io::ErrorKind::InvalidData, e)))
}
