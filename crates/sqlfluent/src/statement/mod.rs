//! Statement building and rendering.
//!
//! A [`StatementBuilder`] holds one statement's intent at a time. The intent is
//! a tagged union ([`Statement`]) so the fields of one kind (INSERT rows,
//! UPDATE assignments, SELECT projection, ...) are only reachable while that
//! kind is active; switching kind drops everything kind-specific.
//!
//! Rendering produces `:name` placeholders and a [`ValueMap`](crate::ValueMap)
//! of bound values; values are never inlined into the SQL text.
//!
//! | kind   | rendered shape |
//! |--------|----------------|
//! | SELECT | `SELECT <projection> FROM <target>[ AS a][ JOIN ...][ WHERE ...][ ORDER BY ...][ LIMIT n];` |
//! | SHOW   | same as SELECT with `SHOW` |
//! | INSERT | `INSERT INTO <target> (<cols>) VALUES (:p0c0, ...), (:p1c0, ...);` |
//! | UPDATE | `UPDATE <target> SET col=:col, ...[ WHERE ...];` |
//! | DELETE | `DELETE FROM <target>[ WHERE ...];` |

mod builder;
mod render;

pub use builder::StatementBuilder;
pub use render::RenderedStatement;

use crate::condition::{Chain, ConditionGroup};
use crate::value::ValueMap;
use std::fmt;
use std::sync::Arc;

/// The SQL operation a builder currently represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatementKind {
    Select,
    Show,
    Insert,
    Update,
    Delete,
    /// Nothing configured yet (or reset by `new_query`).
    #[default]
    None,
}

impl StatementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StatementKind::Select => "SELECT",
            StatementKind::Show => "SHOW",
            StatementKind::Insert => "INSERT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
            StatementKind::None => "NONE",
        }
    }

    /// Returns `true` for kinds that accept condition groups.
    pub fn accepts_conditions(self) -> bool {
        matches!(
            self,
            StatementKind::Select | StatementKind::Show | StatementKind::Update | StatementKind::Delete
        )
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One SELECT/SHOW list item: an expression with an optional alias.
///
/// Converts from `&str`/`String` (bare expression) and from an
/// `(expression, alias)` tuple, rendered as `expression AS alias`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    pub expr: String,
    pub alias: Option<String>,
}

impl Projection {
    pub fn new(expr: impl Into<String>) -> Self {
        Self {
            expr: expr.into(),
            alias: None,
        }
    }

    pub fn aliased(expr: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            expr: expr.into(),
            alias: Some(alias.into()),
        }
    }
}

impl From<&str> for Projection {
    fn from(expr: &str) -> Self {
        Projection::new(expr)
    }
}

impl From<String> for Projection {
    fn from(expr: String) -> Self {
        Projection::new(expr)
    }
}

impl<E: Into<String>, A: Into<String>> From<(E, A)> for Projection {
    fn from((expr, alias): (E, A)) -> Self {
        Projection::aliased(expr, alias)
    }
}

/// A statement target: table name (already prefixed) and optional alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub table: String,
    pub alias: Option<String>,
}

/// JOIN flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Cross,
}

impl JoinKind {
    fn as_sql(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Cross => "CROSS JOIN",
        }
    }
}

/// A JOIN clause for SELECT/SHOW statements.
///
/// ```
/// use sqlfluent::Join;
///
/// let join = Join::left("#__roles", "r.id = u.role_id").alias("r");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub kind: JoinKind,
    pub table: String,
    pub alias: Option<String>,
    /// ON expression; ignored for CROSS JOIN.
    pub on: String,
}

impl Join {
    pub fn new(kind: JoinKind, table: impl Into<String>, on: impl Into<String>) -> Self {
        Self {
            kind,
            table: table.into(),
            alias: None,
            on: on.into(),
        }
    }

    pub fn inner(table: impl Into<String>, on: impl Into<String>) -> Self {
        Self::new(JoinKind::Inner, table, on)
    }

    pub fn left(table: impl Into<String>, on: impl Into<String>) -> Self {
        Self::new(JoinKind::Left, table, on)
    }

    pub fn right(table: impl Into<String>, on: impl Into<String>) -> Self {
        Self::new(JoinKind::Right, table, on)
    }

    pub fn cross(table: impl Into<String>) -> Self {
        Self::new(JoinKind::Cross, table, String::new())
    }

    /// Set the joined table's alias.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

/// Sort direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    fn as_sql(self) -> &'static str {
        match self {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OrderBy {
    pub(crate) expr: String,
    pub(crate) dir: SortDir,
}

/// A condition group attached to a statement, with its chain relative to the
/// previously attached group.
#[derive(Debug, Clone)]
pub(crate) struct AttachedCondition {
    pub(crate) group: Arc<ConditionGroup>,
    pub(crate) chain: Chain,
}

/// SELECT / SHOW fields.
#[derive(Debug, Clone, Default)]
pub(crate) struct SelectParts {
    pub(crate) projection: Vec<Projection>,
    pub(crate) target: Option<Target>,
    pub(crate) joins: Vec<Join>,
    pub(crate) conditions: Vec<AttachedCondition>,
    pub(crate) order_by: Vec<OrderBy>,
    pub(crate) limit: Option<u64>,
}

/// INSERT fields.
#[derive(Debug, Clone, Default)]
pub(crate) struct InsertParts {
    pub(crate) target: Option<String>,
    pub(crate) rows: Vec<ValueMap>,
}

/// UPDATE fields.
#[derive(Debug, Clone)]
pub(crate) struct UpdateParts {
    pub(crate) target: String,
    pub(crate) assignments: ValueMap,
    pub(crate) conditions: Vec<AttachedCondition>,
}

/// DELETE fields.
#[derive(Debug, Clone, Default)]
pub(crate) struct DeleteParts {
    pub(crate) target: Option<Target>,
    pub(crate) conditions: Vec<AttachedCondition>,
}

/// One statement's intent, one variant per kind.
#[derive(Debug, Clone, Default)]
pub(crate) enum Statement {
    #[default]
    None,
    Select(SelectParts),
    Show(SelectParts),
    Insert(InsertParts),
    Update(UpdateParts),
    Delete(DeleteParts),
}

impl Statement {
    pub(crate) fn kind(&self) -> StatementKind {
        match self {
            Statement::None => StatementKind::None,
            Statement::Select(_) => StatementKind::Select,
            Statement::Show(_) => StatementKind::Show,
            Statement::Insert(_) => StatementKind::Insert,
            Statement::Update(_) => StatementKind::Update,
            Statement::Delete(_) => StatementKind::Delete,
        }
    }

    /// Condition list of the active kind, if it accepts conditions.
    pub(crate) fn conditions_mut(&mut self) -> Option<&mut Vec<AttachedCondition>> {
        match self {
            Statement::Select(parts) | Statement::Show(parts) => Some(&mut parts.conditions),
            Statement::Update(parts) => Some(&mut parts.conditions),
            Statement::Delete(parts) => Some(&mut parts.conditions),
            Statement::None | Statement::Insert(_) => None,
        }
    }

    /// SELECT/SHOW fields, if one of those kinds is active.
    pub(crate) fn select_mut(&mut self) -> Option<&mut SelectParts> {
        match self {
            Statement::Select(parts) | Statement::Show(parts) => Some(parts),
            _ => None,
        }
    }
}
