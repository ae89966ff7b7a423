//! Execution backends.
//!
//! A backend prepares SQL text carrying `:name` placeholders, binds a
//! [`ValueMap`] by name and returns rows as [`Row`]s. The builder only talks to
//! these two traits, so tests can substitute an in-process fake.

pub mod sqlite;

use crate::error::DbResult;
use crate::row::Row;
use crate::value::ValueMap;

/// A connection able to prepare statements.
pub trait Connection {
    /// Prepared statement type, borrowing the connection.
    type Prepared<'conn>: PreparedStatement
    where
        Self: 'conn;

    /// Prepare `sql` for execution.
    fn prepare<'conn>(&'conn self, sql: &str) -> DbResult<Self::Prepared<'conn>>;

    /// Row id generated by the most recent successful INSERT on this
    /// connection, if the backend tracks one.
    fn last_insert_id(&self) -> Option<i64>;
}

/// A statement prepared by a [`Connection`].
pub trait PreparedStatement {
    /// Bind `values` by placeholder name and execute.
    ///
    /// Every placeholder in the SQL must have a value and every value must
    /// match a placeholder; anything else is a backend error.
    fn execute(&mut self, values: &ValueMap) -> DbResult<()>;

    /// Drain the rows produced by the last `execute`.
    fn fetch_all(&mut self) -> DbResult<Vec<Row>>;
}
