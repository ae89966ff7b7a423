//! Column identifier handling.
//!
//! Column names are passed through verbatim except when they collide with a
//! reserved word, in which case they are double-quoted (`group` -> `"group"`).
//! Qualified names (`u.id`), expressions (`COUNT(*)`) and names that are
//! already quoted are left untouched.

use std::borrow::Cow;

const RESERVED: &[&str] = &[
    "add", "all", "alter", "and", "as", "asc", "between", "by", "case", "check", "column",
    "create", "default", "delete", "desc", "distinct", "drop", "else", "end", "exists", "from",
    "group", "having", "in", "index", "insert", "into", "is", "join", "key", "like", "limit",
    "not", "null", "offset", "on", "or", "order", "primary", "references", "select", "set",
    "table", "then", "to", "union", "unique", "update", "values", "when", "where",
];

/// Returns `true` if `name` is a reserved SQL word (case-insensitive).
pub fn is_reserved(name: &str) -> bool {
    RESERVED.iter().any(|word| word.eq_ignore_ascii_case(name))
}

/// Quote `name` if it is a bare reserved word.
pub fn quote_column(name: &str) -> Cow<'_, str> {
    if is_reserved(name) {
        Cow::Owned(format!("\"{}\"", name.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_words_are_quoted() {
        assert_eq!(quote_column("group"), "\"group\"");
        assert_eq!(quote_column("ORDER"), "\"ORDER\"");
    }

    #[test]
    fn ordinary_names_pass_through() {
        assert!(matches!(quote_column("age"), Cow::Borrowed("age")));
        assert_eq!(quote_column("u.group"), "u.group");
        assert_eq!(quote_column("\"group\""), "\"group\"");
    }
}
