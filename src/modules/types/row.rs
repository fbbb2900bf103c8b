//! Result rows returned by relational branches

/// One result row: column name to scalar JSON value
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Ordered rows produced by executing a synthesized query
pub type ResultSet = Vec<Row>;

/// Render a result set for inclusion in a prompt (pretty JSON, 2-space indent)
pub fn render_rows(rows: &ResultSet) -> String {
    // A map of JSON values always serializes
    serde_json::to_string_pretty(rows).unwrap_or_else(|_| "[]".to_string())
}
