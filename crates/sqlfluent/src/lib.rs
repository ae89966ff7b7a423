//! # sqlfluent
//!
//! A fluent SQL statement builder with composable condition groups.
//!
//! ## Features
//!
//! - **Parameter-safe**: values are bound to `:name` placeholders, never inlined
//! - **Reusable conditions**: a [`ConditionGroup`] renders with a caller-chosen
//!   key prefix, so one group can be attached to many statements
//! - **One kind at a time**: a statement is a tagged union per kind, so INSERT
//!   rows can't leak into a SELECT
//! - **Explicit failures**: wrong-kind calls, unrenderable statements and
//!   backend rejections are distinct [`DbError`] variants
//!
//! ## Example
//!
//! ```
//! use sqlfluent::{Chain, ConditionGroup, Database, DbConfig, values};
//!
//! let db = Database::open(&DbConfig::memory())?;
//! db.run_sql("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT, age INTEGER)")?;
//!
//! let mut stmt = db.statement();
//! stmt.multiple_insert([
//!     values! { "name" => "ada", "age" => 36 },
//!     values! { "name" => "alan", "age" => 41 },
//! ])
//! .insert_into("users")?;
//! db.execute(&mut stmt)?;
//!
//! let mut adults = ConditionGroup::new();
//! adults.gt("age", 40);
//!
//! stmt.new_query()
//!     .select(["name"])
//!     .from("users")?
//!     .add_condition(&adults, Chain::And)?;
//! db.execute(&mut stmt)?;
//!
//! let row = stmt.result().expect("one row");
//! assert_eq!(row.get("name").and_then(|v| v.as_str()), Some("alan"));
//! # Ok::<(), sqlfluent::DbError>(())
//! ```

pub mod backend;
pub mod condition;
pub mod config;
pub mod database;
pub mod error;
pub mod ident;
pub mod row;
pub mod statement;
pub mod value;

mod trace;

pub use backend::sqlite::{SqliteConnection, SqliteStatement};
pub use backend::{Connection, PreparedStatement};
pub use condition::{Chain, Comparator, ConditionGroup, RenderedCondition};
pub use config::{DbConfig, TablePrefix};
pub use database::Database;
pub use error::{DbError, DbResult};
pub use row::Row;
pub use statement::{
    Join, JoinKind, Projection, RenderedStatement, SortDir, StatementBuilder, StatementKind,
};
pub use value::{Value, ValueMap};
