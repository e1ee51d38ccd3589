//! Shared helpers for integration tests.
//!
//! Builds an in-memory SQLite copy of the ads schema (ads, funders, pages)
//! and wires it into an export pipeline.

#![allow(dead_code)]

use std::sync::Arc;

use ad_export::export::{ExportPipeline, ExportProfile, Identifier, SqliteSource};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

/// Creates an empty in-memory database.
///
/// A single connection that is never recycled, so every query sees the
/// same in-memory database.
pub async fn create_empty_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool")
}

/// Creates an in-memory database with the ads schema.
pub async fn create_test_pool() -> SqlitePool {
    let pool = create_empty_pool().await;
    for statement in [
        "CREATE TABLE funders (id INTEGER PRIMARY KEY, name TEXT NOT NULL)",
        "CREATE TABLE pages (id INTEGER PRIMARY KEY, name TEXT NOT NULL)",
        "CREATE TABLE ads (
            id INTEGER PRIMARY KEY,
            body TEXT,
            start_date DATETIME,
            end_date DATETIME,
            created_at INTEGER,
            funder_id INTEGER,
            page_id INTEGER,
            currency TEXT,
            audience_min INTEGER,
            audience_max INTEGER,
            views_min INTEGER,
            views_max INTEGER,
            cost_min INTEGER,
            cost_max INTEGER,
            link_title TEXT,
            link_url TEXT,
            description TEXT,
            provinces TEXT,
            demographics TEXT,
            platforms TEXT,
            languages TEXT
        )",
    ] {
        sqlx::query(statement)
            .execute(&pool)
            .await
            .expect("Failed to create schema");
    }
    pool
}

pub async fn create_test_funder(pool: &SqlitePool, id: i64, name: &str) {
    sqlx::query("INSERT INTO funders (id, name) VALUES (?, ?)")
        .bind(id)
        .bind(name)
        .execute(pool)
        .await
        .expect("Failed to insert funder");
}

pub async fn create_test_page(pool: &SqlitePool, id: i64, name: &str) {
    sqlx::query("INSERT INTO pages (id, name) VALUES (?, ?)")
        .bind(id)
        .bind(name)
        .execute(pool)
        .await
        .expect("Failed to insert page");
}

/// Inserts an ad with fixed dates and spend figures.
pub async fn create_test_ad(
    pool: &SqlitePool,
    id: i64,
    funder_id: Option<i64>,
    page_id: Option<i64>,
) {
    sqlx::query(
        "INSERT INTO ads (
            id, body, start_date, end_date, created_at, funder_id, page_id, currency,
            audience_min, audience_max, views_min, views_max, cost_min, cost_max,
            link_title, link_url, description, provinces, demographics, platforms, languages
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(format!("Ad body {}", id))
    .bind("2024-01-15 08:30:00")
    .bind("2024-02-01 23:59:59")
    .bind(1705307400i64) // 2024-01-15 08:30:00 UTC
    .bind(funder_id)
    .bind(page_id)
    .bind("CAD")
    .bind(1000i64)
    .bind(5000i64)
    .bind(2000i64)
    .bind(2999i64)
    .bind(100i64)
    .bind(199i64)
    .bind("Learn more")
    .bind("https://example.org/campaign")
    .bind("A description, with a comma")
    .bind("ON,QC")
    .bind("18-24")
    .bind("facebook,instagram")
    .bind("en,fr")
    .execute(pool)
    .await
    .expect("Failed to insert ad");
}

/// Inserts ads `1..=count` with bodies only, in a single statement.
pub async fn create_many_ads(pool: &SqlitePool, count: i64) {
    sqlx::query(
        "WITH RECURSIVE seq(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM seq WHERE x < ?)
         INSERT INTO ads (id, body, start_date) SELECT x, 'Ad body ' || x, '2024-06-01 12:00:00' FROM seq",
    )
    .bind(count)
    .execute(pool)
    .await
    .expect("Failed to insert ads");
}

pub fn pipeline_for(pool: SqlitePool, profile: ExportProfile) -> ExportPipeline {
    ExportPipeline::new(Arc::new(SqliteSource::new(pool)), profile)
}

pub fn int_ids(ids: impl IntoIterator<Item = i64>) -> Vec<Identifier> {
    ids.into_iter().map(Identifier::Int).collect()
}

/// Parses CSV text into (header, rows).
pub fn parse_csv(text: &str) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let header = reader
        .headers()
        .expect("CSV header")
        .iter()
        .map(str::to_string)
        .collect();
    let rows = reader
        .records()
        .map(|r| r.expect("CSV row").iter().map(str::to_string).collect())
        .collect();
    (header, rows)
}

/// Value of `column` in `row`, located through the header.
pub fn cell<'a>(header: &[String], row: &'a [String], column: &str) -> &'a str {
    let index = header
        .iter()
        .position(|h| h == column)
        .unwrap_or_else(|| panic!("column {} not in header {:?}", column, header));
    &row[index]
}
