//! SQL logging via `tracing`.
//!
//! Events are emitted under the `sqlfluent.sql` target; the library never
//! installs a subscriber.

/// Longest SQL text (in bytes) included in a log event.
pub const MAX_LOGGED_SQL_BYTES: usize = 200;

pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

fn display_sql(sql: &str) -> String {
    let shown = truncate_sql_bytes(sql, MAX_LOGGED_SQL_BYTES);
    if shown.len() < sql.len() {
        format!("{shown}...")
    } else {
        shown.to_string()
    }
}

/// Logged right before a statement is handed to the backend.
pub(crate) fn statement_start(kind: &str, sql: &str, param_count: usize) {
    tracing::debug!(
        target: "sqlfluent.sql",
        kind,
        param_count,
        sql = %display_sql(sql),
        "executing statement"
    );
}

/// Logged after rows have been fetched.
pub(crate) fn statement_done(kind: &str, row_count: usize, last_insert_id: Option<i64>) {
    tracing::trace!(
        target: "sqlfluent.sql",
        kind,
        row_count,
        last_insert_id = ?last_insert_id,
        "statement complete"
    );
}

/// Logged when the backend rejects a statement.
pub(crate) fn statement_failed(kind: &str, sql: &str, error: &dyn std::fmt::Display) {
    tracing::warn!(
        target: "sqlfluent.sql",
        kind,
        sql = %display_sql(sql),
        error = %error,
        "statement failed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_respects_char_boundaries() {
        let sql = "SELECT 'héllo'";
        // byte 10 falls inside the two-byte 'é'
        assert_eq!(truncate_sql_bytes(sql, 10), "SELECT 'h");
        assert_eq!(truncate_sql_bytes(sql, 100), sql);
    }

    #[test]
    fn long_sql_is_marked() {
        let sql = "x".repeat(MAX_LOGGED_SQL_BYTES + 5);
        let shown = display_sql(&sql);
        assert!(shown.ends_with("..."));
        assert_eq!(shown.len(), MAX_LOGGED_SQL_BYTES + 3);
    }
}
