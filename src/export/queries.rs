//! Lookup query construction.
//!
//! The SQL text depends only on the profile and the batch length, never on
//! identifier values: every id is sent as a bound `?` parameter. Both
//! supported stores (MySQL and SQLite) accept `?` placeholders.

use super::profile::ExportProfile;

/// Builds `n` comma-separated placeholders.
pub(crate) fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

/// Builds the batch lookup statement for `batch_len` identifiers.
///
/// Selected columns appear in profile order, so row column `i` decodes as
/// `profile.columns[i]`.
pub(crate) fn build_lookup_sql(profile: &ExportProfile, batch_len: usize) -> String {
    let select_list = profile
        .columns
        .iter()
        .map(|c| format!("{} AS {}", c.expr, c.name))
        .collect::<Vec<_>>()
        .join(",\n       ");

    let mut sql = format!("SELECT {}\nFROM {}", select_list, profile.entity_table);
    for join in &profile.joins {
        sql.push_str(&format!("\nLEFT JOIN {} ON {}", join.table, join.on));
    }
    sql.push_str(&format!(
        "\nWHERE {} IN ({})\nORDER BY {}",
        profile.id_column,
        placeholders(batch_len),
        profile.id_column
    ));
    sql
}
