//! Error types for sqlfluent

use crate::statement::StatementKind;
use thiserror::Error;

/// Result type alias for sqlfluent operations
pub type DbResult<T> = Result<T, DbError>;

/// Error types for statement building and execution
#[derive(Debug, Error)]
pub enum DbError {
    /// Missing or invalid connection configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The statement cannot be rendered from its current fragments
    #[error("Render error: {0}")]
    Render(String),

    /// The backend rejected the statement (prepare, bind or execute)
    #[error("Backend error: {0}")]
    Backend(String),

    /// SQLite driver error
    #[error("Backend error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Operation not supported by the active statement kind
    #[error("State error: `{operation}` is not valid for a {kind} statement")]
    State {
        operation: &'static str,
        kind: StatementKind,
    },
}

impl DbError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a render error
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render(message.into())
    }

    /// Create a backend error
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// Create a state error for `operation` attempted on a `kind` statement
    pub fn state(operation: &'static str, kind: StatementKind) -> Self {
        Self::State { operation, kind }
    }

    /// Check if this is a configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Check if this is a render error
    pub fn is_render(&self) -> bool {
        matches!(self, Self::Render(_))
    }

    /// Check if the backend rejected the statement
    pub fn is_backend(&self) -> bool {
        matches!(self, Self::Backend(_) | Self::Sqlite(_))
    }

    /// Check if this is a state error
    pub fn is_state(&self) -> bool {
        matches!(self, Self::State { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_error_names_operation_and_kind() {
        let err = DbError::state("set", StatementKind::Select);
        assert!(err.is_state());
        assert_eq!(
            err.to_string(),
            "State error: `set` is not valid for a SELECT statement"
        );
    }

    #[test]
    fn sqlite_errors_count_as_backend() {
        let err = DbError::from(rusqlite::Error::InvalidQuery);
        assert!(err.is_backend());
        assert!(!err.is_render());
    }
}
