//! Record sources: the read-only query side of the export.
//!
//! A source runs one batch lookup and returns decoded records in ascending
//! id order. The connection pool is owned by whoever builds the source.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use log::debug;
use sqlx::{
    ColumnIndex, Database, Decode, Encode, Executor, IntoArguments, MySql, MySqlPool, Sqlite,
    SqlitePool, Type,
};

use crate::config::SET_UTC_TIME_ZONE;

use super::profile::ExportProfile;
use super::queries::build_lookup_sql;
use super::row::decode_record;
use super::types::{Identifier, Record};

/// Runs batch lookups against a relational store.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetches the records matching `ids`, ordered by id. Ids without a
    /// matching row are simply absent from the result.
    async fn fetch_batch(
        &self,
        profile: &ExportProfile,
        ids: &[Identifier],
    ) -> Result<Vec<Record>, sqlx::Error>;
}

/// Runs each `session` statement and then the batch lookup, all on `conn`.
///
/// Session settings such as the time zone are per connection, so the
/// lookup must not be handed to another pooled connection.
pub(crate) async fn lookup_in_session<DB>(
    conn: &mut DB::Connection,
    session: &[&str],
    profile: &ExportProfile,
    ids: &[Identifier],
) -> Result<Vec<Record>, sqlx::Error>
where
    DB: Database,
    for<'c> &'c mut DB::Connection: Executor<'c, Database = DB>,
    for<'q> DB::Arguments<'q>: IntoArguments<'q, DB>,
    for<'q> i64: Encode<'q, DB>,
    i64: Type<DB>,
    for<'q> &'q str: Encode<'q, DB>,
    str: Type<DB>,
    usize: ColumnIndex<DB::Row>,
    for<'r> Option<String>: Decode<'r, DB>,
    Option<String>: Type<DB>,
    for<'r> Option<i64>: Decode<'r, DB>,
    Option<i64>: Type<DB>,
    for<'r> Option<f64>: Decode<'r, DB>,
    Option<f64>: Type<DB>,
    for<'r> Option<NaiveDateTime>: Decode<'r, DB>,
    Option<NaiveDateTime>: Type<DB>,
{
    for statement in session {
        sqlx::query::<DB>(statement).execute(&mut *conn).await?;
    }

    let sql = build_lookup_sql(profile, ids.len());
    let mut query = sqlx::query::<DB>(&sql);
    for id in ids {
        query = match id {
            Identifier::Int(v) => query.bind(*v),
            Identifier::Text(s) => query.bind(s.as_str()),
        };
    }

    let rows = query.fetch_all(&mut *conn).await?;
    debug!("Lookup of {} ids returned {} rows", ids.len(), rows.len());

    rows.iter().map(|row| decode_record(row, profile)).collect()
}

/// MySQL-backed source.
///
/// Each batch checks out one connection, pins its session to UTC and runs
/// the lookup on that same connection.
pub struct MySqlSource {
    pool: MySqlPool,
}

impl MySqlSource {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordSource for MySqlSource {
    async fn fetch_batch(
        &self,
        profile: &ExportProfile,
        ids: &[Identifier],
    ) -> Result<Vec<Record>, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        lookup_in_session::<MySql>(&mut *conn, &[SET_UTC_TIME_ZONE], profile, ids).await
    }
}

/// SQLite-backed source, for local database files and tests.
///
/// SQLite has no session time zone; date columns are expected to hold UTC
/// text (`YYYY-MM-DD HH:MM:SS`) or epoch seconds.
pub struct SqliteSource {
    pool: SqlitePool,
}

impl SqliteSource {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordSource for SqliteSource {
    async fn fetch_batch(
        &self,
        profile: &ExportProfile,
        ids: &[Identifier],
    ) -> Result<Vec<Record>, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        lookup_in_session::<Sqlite>(&mut *conn, &[], profile, ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::types::Value;
    use sqlx::sqlite::SqlitePoolOptions;

    fn two_column_profile() -> ExportProfile {
        ExportProfile::from_json_str(
            r#"{
                "entity_table": "ads",
                "id_column": "ads.id",
                "columns": [
                    {"name": "id", "expr": "ads.id", "kind": "integer"},
                    {"name": "body", "expr": "ads.body", "kind": "text"}
                ]
            }"#,
        )
        .expect("valid profile")
    }

    /// Two in-memory connections: each one is a separate database.
    async fn two_connection_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(2)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create test database pool")
    }

    #[tokio::test]
    async fn test_session_statements_share_the_lookup_connection() {
        let pool = two_connection_pool().await;
        let mut conn = pool.acquire().await.expect("connection");

        // The table only exists on this connection
        let session = [
            "CREATE TEMP TABLE ads (id INTEGER PRIMARY KEY, body TEXT)",
            "INSERT INTO ads (id, body) VALUES (9, 'nine'), (7, 'seven')",
        ];
        let ids = vec![Identifier::Int(9), Identifier::Text("7".to_string())];
        let records = lookup_in_session::<Sqlite>(&mut *conn, &session, &two_column_profile(), &ids)
            .await
            .expect("lookup");

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("id"), Some(&Value::Integer(7)));
        assert_eq!(records[1].get("body").and_then(Value::as_str), Some("nine"));
    }

    #[tokio::test]
    async fn test_other_connection_does_not_see_session_state() {
        let pool = two_connection_pool().await;
        let mut held = pool.acquire().await.expect("connection");
        sqlx::query("CREATE TEMP TABLE ads (id INTEGER PRIMARY KEY, body TEXT)")
            .execute(&mut *held)
            .await
            .expect("create temp table");

        // With `held` checked out the source gets the other connection
        let source = SqliteSource::new(pool.clone());
        let result = source
            .fetch_batch(&two_column_profile(), &[Identifier::Int(1)])
            .await;
        assert!(result.is_err());
    }
}
