//! SQLite backend using `rusqlite`.
//!
//! SQLite understands `:name` placeholders natively, so rendered SQL is
//! prepared as-is and values are bound by name.

use super::{Connection, PreparedStatement};
use crate::error::{DbError, DbResult};
use crate::row::Row;
use crate::value::{Value, ValueMap};
use rusqlite::types::{ToSql, ToSqlOutput, ValueRef};
use std::path::Path;

/// A single SQLite connection.
pub struct SqliteConnection {
    conn: rusqlite::Connection,
}

impl std::fmt::Debug for SqliteConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteConnection")
            .field("path", &self.conn.path())
            .finish()
    }
}

impl SqliteConnection {
    /// Open the database at `path`. `:memory:` opens a private in-memory
    /// database.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref();
        let conn = if path.to_str() == Some(":memory:") {
            rusqlite::Connection::open_in_memory()
        } else {
            rusqlite::Connection::open(path)
        }
        .map_err(|e| DbError::backend(format!("SQLite open failed: {e}")))?;

        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open a private in-memory database.
    pub fn memory() -> DbResult<Self> {
        Self::open(":memory:")
    }

    /// Wrap an existing `rusqlite` connection.
    pub fn from_rusqlite(conn: rusqlite::Connection) -> Self {
        Self { conn }
    }

    /// The underlying `rusqlite` connection.
    pub fn inner(&self) -> &rusqlite::Connection {
        &self.conn
    }
}

impl Connection for SqliteConnection {
    type Prepared<'conn> = SqliteStatement<'conn>;

    fn prepare<'conn>(&'conn self, sql: &str) -> DbResult<SqliteStatement<'conn>> {
        let stmt = self.conn.prepare(sql)?;
        Ok(SqliteStatement {
            stmt,
            rows: Vec::new(),
        })
    }

    fn last_insert_id(&self) -> Option<i64> {
        match self.conn.last_insert_rowid() {
            0 => None,
            id => Some(id),
        }
    }
}

/// A prepared SQLite statement.
pub struct SqliteStatement<'conn> {
    stmt: rusqlite::Statement<'conn>,
    rows: Vec<Row>,
}

impl SqliteStatement<'_> {
    fn bind(&mut self, values: &ValueMap) -> DbResult<()> {
        for (key, value) in values.iter() {
            let idx = self
                .stmt
                .parameter_index(&format!(":{key}"))?
                .ok_or_else(|| {
                    DbError::backend(format!("no placeholder `:{key}` in statement"))
                })?;
            self.stmt.raw_bind_parameter(idx, value)?;
        }

        for idx in 1..=self.stmt.parameter_count() {
            let name = self.stmt.parameter_name(idx).unwrap_or("?");
            let bound = name
                .strip_prefix(':')
                .is_some_and(|key| values.contains_key(key));
            if !bound {
                return Err(DbError::backend(format!(
                    "placeholder `{name}` has no bound value"
                )));
            }
        }
        Ok(())
    }
}

impl PreparedStatement for SqliteStatement<'_> {
    fn execute(&mut self, values: &ValueMap) -> DbResult<()> {
        self.rows.clear();
        self.bind(values)?;

        if self.stmt.column_count() == 0 {
            self.stmt.raw_execute()?;
            return Ok(());
        }

        let columns: Vec<String> = self
            .stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();

        let mut fetched = Vec::new();
        let mut rows = self.stmt.raw_query();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(columns.len());
            for i in 0..columns.len() {
                values.push(from_value_ref(row.get_ref(i)?));
            }
            fetched.push(Row::new(columns.clone(), values));
        }
        drop(rows);

        self.rows = fetched;
        Ok(())
    }

    fn fetch_all(&mut self) -> DbResult<Vec<Row>> {
        Ok(std::mem::take(&mut self.rows))
    }
}

fn from_value_ref(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(v) => Value::Int(v),
        ValueRef::Real(v) => Value::Float(v),
        ValueRef::Text(b) => Value::Text(String::from_utf8_lossy(b).into_owned()),
        ValueRef::Blob(b) => Value::Bytes(b.to_vec()),
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        use rusqlite::types::Value as Sql;

        Ok(match self {
            Value::Null => ToSqlOutput::Owned(Sql::Null),
            Value::Bool(b) => ToSqlOutput::Owned(Sql::Integer(i64::from(*b))),
            Value::Int(v) => ToSqlOutput::Owned(Sql::Integer(*v)),
            Value::Float(v) => ToSqlOutput::Owned(Sql::Real(*v)),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Value::Bytes(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b)),
            Value::Json(j) => ToSqlOutput::Owned(Sql::Text(j.to_string())),
            Value::Uuid(u) => ToSqlOutput::Owned(Sql::Text(u.to_string())),
            Value::DateTime(dt) => ToSqlOutput::Owned(Sql::Text(dt.to_string())),
            // Lists are expanded into one placeholder per element when
            // rendered; one reaching the driver has nowhere to go.
            Value::List(_) => {
                return Err(rusqlite::Error::ToSqlConversionFailure(
                    "list values can only be bound through IN / NOT IN".into(),
                ));
            }
        })
    }
}
