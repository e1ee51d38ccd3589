//! Row decoding.
//!
//! Turns a fetched database row into a [`Record`], applying the profile's
//! column kinds, date formatting, placeholders and derived columns. The
//! decoder is generic over the sqlx row type so MySQL and SQLite share it.

use chrono::{DateTime, NaiveDateTime};
use sqlx::{ColumnIndex, Decode, Row, Type};

use crate::config::DATE_TIME_FORMAT;

use super::profile::{ColumnKind, ExportProfile};
use super::types::{Record, Value};

/// Formats a naive (UTC) datetime as `YYYY-MM-DD HH:MM:SS`.
pub(crate) fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format(DATE_TIME_FORMAT).to_string()
}

/// Formats epoch seconds as `YYYY-MM-DD HH:MM:SS` UTC, or `None` when the
/// timestamp is outside chrono's range.
pub(crate) fn format_epoch_seconds(secs: i64) -> Option<String> {
    DateTime::from_timestamp(secs, 0).map(|dt| format_datetime(&dt.naive_utc()))
}

/// Decodes one row into a record: derived fields first, then selected
/// columns in profile order.
pub(crate) fn decode_record<R>(row: &R, profile: &ExportProfile) -> Result<Record, sqlx::Error>
where
    R: Row,
    usize: ColumnIndex<R>,
    for<'r> Option<String>: Decode<'r, R::Database>,
    Option<String>: Type<R::Database>,
    for<'r> Option<i64>: Decode<'r, R::Database>,
    Option<i64>: Type<R::Database>,
    for<'r> Option<f64>: Decode<'r, R::Database>,
    Option<f64>: Type<R::Database>,
    for<'r> Option<NaiveDateTime>: Decode<'r, R::Database>,
    Option<NaiveDateTime>: Type<R::Database>,
{
    let mut selected = Vec::with_capacity(profile.columns.len());
    for (index, column) in profile.columns.iter().enumerate() {
        let value = match column.kind {
            ColumnKind::Text => row
                .try_get::<Option<String>, _>(index)?
                .map(Value::Text)
                .unwrap_or(Value::Null),
            ColumnKind::Integer => row
                .try_get::<Option<i64>, _>(index)?
                .map(Value::Integer)
                .unwrap_or(Value::Null),
            ColumnKind::Float => row
                .try_get::<Option<f64>, _>(index)?
                .map(Value::Float)
                .unwrap_or(Value::Null),
            ColumnKind::Datetime => Value::Text(
                row.try_get::<Option<NaiveDateTime>, _>(index)?
                    .map(|dt| format_datetime(&dt))
                    .unwrap_or_else(|| profile.date_placeholder.clone()),
            ),
            ColumnKind::EpochSeconds => Value::Text(
                row.try_get::<Option<i64>, _>(index)?
                    .and_then(format_epoch_seconds)
                    .unwrap_or_else(|| profile.date_placeholder.clone()),
            ),
        };
        selected.push((column.name.as_str(), value));
    }

    let id = selected
        .iter()
        .find(|(name, _)| *name == profile.id_field)
        .map(|(_, value)| value.to_string())
        .unwrap_or_default();

    let mut record = Record::new();
    for derived in &profile.derived {
        record.push(derived.name.as_str(), Value::Text(derived.render(&id)));
    }
    for (name, value) in selected {
        record.push(name, value);
    }
    Ok(record)
}
