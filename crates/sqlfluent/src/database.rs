//! Connection + table prefix, bundled.

use crate::backend::Connection;
use crate::backend::sqlite::SqliteConnection;
use crate::config::{DbConfig, TablePrefix};
use crate::error::DbResult;
use crate::row::Row;
use crate::statement::StatementBuilder;

/// A connection opened from a [`DbConfig`], together with its table prefix.
///
/// ```
/// use sqlfluent::{Database, DbConfig, values};
///
/// let db = Database::open(&DbConfig::memory().table_prefix("app_"))?;
/// db.run_sql("CREATE TABLE #__users (id INTEGER PRIMARY KEY, name TEXT)")?;
///
/// let mut insert = db.statement();
/// insert.insert(values! { "name" => "ada" }).insert_into("#__users")?;
/// db.execute(&mut insert)?;
/// assert_eq!(insert.last_insert_id(), Some(1));
/// # Ok::<(), sqlfluent::DbError>(())
/// ```
#[derive(Debug)]
pub struct Database<C = SqliteConnection> {
    conn: C,
    prefix: TablePrefix,
}

impl Database<SqliteConnection> {
    /// Validate `config` and open its SQLite database.
    pub fn open(config: &DbConfig) -> DbResult<Self> {
        config.validate()?;
        let conn = SqliteConnection::open(&config.database)?;
        tracing::debug!(
            target: "sqlfluent.sql",
            database = %config.database,
            table_prefix = %config.table_prefix,
            "opened database"
        );
        Ok(Self {
            conn,
            prefix: config.prefix(),
        })
    }

    /// Open the database described by the `SQLFLUENT_*` environment variables.
    pub fn from_env() -> DbResult<Self> {
        Self::open(&DbConfig::from_env()?)
    }
}

impl<C: Connection> Database<C> {
    /// Wrap an already open connection.
    pub fn with_connection(conn: C, prefix: TablePrefix) -> Self {
        Self { conn, prefix }
    }

    /// A fresh builder using this database's table prefix.
    pub fn statement(&self) -> StatementBuilder {
        StatementBuilder::with_prefix(self.prefix.clone())
    }

    /// Execute `builder` on this connection.
    pub fn execute<'b>(&self, builder: &'b mut StatementBuilder) -> DbResult<&'b mut StatementBuilder> {
        builder.execute(&self.conn)
    }

    /// Run raw SQL (prefix applied) and return its rows.
    pub fn run_sql(&self, sql: &str) -> DbResult<Vec<Row>> {
        let mut builder = self.statement();
        builder.run_sql(&self.conn, sql)?;
        Ok(builder.results().map(<[Row]>::to_vec).unwrap_or_default())
    }

    pub fn connection(&self) -> &C {
        &self.conn
    }

    pub fn table_prefix(&self) -> &TablePrefix {
        &self.prefix
    }
}

impl<C: Connection> Connection for Database<C> {
    type Prepared<'conn>
        = C::Prepared<'conn>
    where
        Self: 'conn;

    fn prepare<'conn>(&'conn self, sql: &str) -> DbResult<Self::Prepared<'conn>> {
        self.conn.prepare(sql)
    }

    fn last_insert_id(&self) -> Option<i64> {
        self.conn.last_insert_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_rejects_invalid_config() {
        let err = Database::open(&DbConfig::new("")).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn statements_inherit_prefix() {
        let db = Database::open(&DbConfig::memory().table_prefix("t_")).unwrap();
        let mut builder = db.statement();
        builder.select(["*"]).from("#__items").unwrap();
        assert_eq!(builder.dump().unwrap(), "SELECT * FROM t_items;");
    }
}
