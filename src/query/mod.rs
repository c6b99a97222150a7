// src/query/mod.rs
//
// Pure string construction for the two statements a run needs. Table and
// column identifiers are trusted configuration, not untrusted input, so no
// quoting or escaping is applied.

use chrono::NaiveDate;

/// Column appended to every imported row, holding the run's partition date.
/// It is also the delete predicate that makes daily re-imports idempotent.
pub const PARTITION_COLUMN: &str = "DiffDateTime";

/// Derive destination column names from the raw header row: strip every
/// `"//"`, `'-'` and space from each label, keep the order, then append the
/// partition column. Labels are never dropped, even if they normalize to an
/// empty string, because the insert binds values positionally.
pub fn normalize_columns(header: &[String], partition_column: &str) -> Vec<String> {
    let mut columns: Vec<String> = header
        .iter()
        .map(|label| label.replace("//", "").replace('-', "").replace(' ', ""))
        .collect();
    columns.push(partition_column.to_string());
    columns
}

/// Delete statement clearing one partition, run before a daily re-import.
pub fn build_delete(table: &str, partition_column: &str, date: NaiveDate) -> String {
    format!("delete from {} where {} = '{}'", table, partition_column, date)
}

/// Parameterized insert with one positional placeholder per column.
pub fn build_insert(table: &str, columns: &[String]) -> String {
    let placeholders = vec!["?"; columns.len()].join(",");
    format!(
        "insert into {} ({}) values ({})",
        table,
        columns.join(","),
        placeholders
    )
}
