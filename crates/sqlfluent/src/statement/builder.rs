use super::{
    AttachedCondition, DeleteParts, InsertParts, Join, OrderBy, Projection, RenderedStatement,
    SelectParts, SortDir, Statement, StatementKind, Target, UpdateParts,
};
use crate::backend::{Connection, PreparedStatement};
use crate::condition::{Chain, ConditionGroup};
use crate::config::TablePrefix;
use crate::error::{DbError, DbResult};
use crate::row::Row;
use crate::trace;
use crate::value::{Value, ValueMap};
use std::sync::Arc;

/// Fluent builder for one statement at a time.
///
/// Methods that choose a statement kind (`select`, `show`, `insert`,
/// `multiple_insert`, `update`, `delete`) return `&mut Self`. Methods that
/// only make sense for some kinds return `DbResult<&mut Self>` and fail with
/// [`DbError::State`] when called on any other kind.
///
/// ```
/// use sqlfluent::{ConditionGroup, StatementBuilder};
///
/// let mut group = ConditionGroup::new();
/// group.gt("age", 18).eq("city", "NY");
///
/// let mut builder = StatementBuilder::new();
/// builder
///     .select(["id", "name"])
///     .from("users")?
///     .add_condition(&group, Default::default())?
///     .limit(10)?;
///
/// assert_eq!(
///     builder.dump()?,
///     "SELECT id, name FROM users WHERE (age>:c0p0 AND city=:c0p1) LIMIT 10;"
/// );
/// # Ok::<(), sqlfluent::DbError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct StatementBuilder {
    statement: Statement,
    prefix: TablePrefix,
    bound: ValueMap,
    results: Option<Vec<Row>>,
    last_insert_id: Option<i64>,
}

impl StatementBuilder {
    /// Create a builder with no table prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder that applies `prefix` to every table name it is given.
    pub fn with_prefix(prefix: TablePrefix) -> Self {
        Self {
            prefix,
            ..Self::default()
        }
    }

    pub fn table_prefix(&self) -> &TablePrefix {
        &self.prefix
    }

    /// The active statement kind.
    pub fn kind(&self) -> StatementKind {
        self.statement.kind()
    }

    /// Reset to kind `None`, dropping every fragment and the bound values.
    ///
    /// The result set of the last execution stays readable until the next
    /// `execute`.
    pub fn new_query(&mut self) -> &mut Self {
        self.statement = Statement::None;
        self.bound.clear();
        self
    }

    fn switch_to(&mut self, statement: Statement) {
        self.statement = statement;
        self.bound.clear();
    }

    // ==================== Kinds ====================

    /// Start (or extend) a SELECT projection.
    ///
    /// Items are bare expressions (`"id"`) or `(expression, alias)` pairs.
    /// Calling `select` again while a SELECT is active appends to the
    /// projection; any other kind is replaced.
    pub fn select<I, P>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Projection>,
    {
        if !matches!(self.statement, Statement::Select(_)) {
            self.switch_to(Statement::Select(SelectParts::default()));
        }
        if let Statement::Select(parts) = &mut self.statement {
            parts.projection.extend(items.into_iter().map(Into::into));
        }
        self
    }

    /// Start (or extend) a SHOW projection. Same rules as [`select`](Self::select).
    pub fn show<I, P>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Projection>,
    {
        if !matches!(self.statement, Statement::Show(_)) {
            self.switch_to(Statement::Show(SelectParts::default()));
        }
        if let Statement::Show(parts) = &mut self.statement {
            parts.projection.extend(items.into_iter().map(Into::into));
        }
        self
    }

    /// Add one INSERT row. An active INSERT keeps its target and earlier rows.
    pub fn insert(&mut self, row: ValueMap) -> &mut Self {
        self.multiple_insert([row])
    }

    /// Add several INSERT rows. Every row must carry the same columns.
    pub fn multiple_insert<I>(&mut self, rows: I) -> &mut Self
    where
        I: IntoIterator<Item = ValueMap>,
    {
        if !matches!(self.statement, Statement::Insert(_)) {
            self.switch_to(Statement::Insert(InsertParts::default()));
        }
        if let Statement::Insert(parts) = &mut self.statement {
            parts.rows.extend(rows);
        }
        self
    }

    /// Start an UPDATE of `table`.
    pub fn update(&mut self, table: &str) -> &mut Self {
        let target = self.prefix.apply(table);
        self.switch_to(Statement::Update(UpdateParts {
            target,
            assignments: ValueMap::new(),
            conditions: Vec::new(),
        }));
        self
    }

    /// Start a DELETE restricted by `group`. The target is set with
    /// [`from`](Self::from).
    ///
    /// On an active DELETE the group is attached with AND instead.
    pub fn delete(&mut self, group: impl Into<Arc<ConditionGroup>>) -> &mut Self {
        if !matches!(self.statement, Statement::Delete(_)) {
            self.switch_to(Statement::Delete(DeleteParts::default()));
        }
        if let Statement::Delete(parts) = &mut self.statement {
            parts.conditions.push(AttachedCondition {
                group: group.into(),
                chain: Chain::And,
            });
        }
        self
    }

    // ==================== Kind-specific fields ====================

    /// Set the FROM target (SELECT, SHOW, DELETE).
    pub fn from(&mut self, table: &str) -> DbResult<&mut Self> {
        self.set_target("from", table, None)
    }

    /// Set the FROM target with an alias (SELECT, SHOW, DELETE).
    pub fn from_as(&mut self, table: &str, alias: &str) -> DbResult<&mut Self> {
        self.set_target("from", table, Some(alias.to_string()))
    }

    fn set_target(
        &mut self,
        operation: &'static str,
        table: &str,
        alias: Option<String>,
    ) -> DbResult<&mut Self> {
        let target = Target {
            table: self.prefix.apply(table),
            alias,
        };
        match &mut self.statement {
            Statement::Select(parts) | Statement::Show(parts) => parts.target = Some(target),
            Statement::Delete(parts) => parts.target = Some(target),
            other => return Err(DbError::state(operation, other.kind())),
        }
        Ok(self)
    }

    /// Set the INSERT target. Call after `insert`/`multiple_insert`.
    pub fn insert_into(&mut self, table: &str) -> DbResult<&mut Self> {
        let table = self.prefix.apply(table);
        match &mut self.statement {
            Statement::Insert(parts) => parts.target = Some(table),
            other => return Err(DbError::state("insert_into", other.kind())),
        }
        Ok(self)
    }

    /// Add (or replace) an UPDATE assignment.
    pub fn set(&mut self, column: &str, value: impl Into<Value>) -> DbResult<&mut Self> {
        match &mut self.statement {
            Statement::Update(parts) => {
                parts.assignments.insert(column, value);
            }
            other => return Err(DbError::state("set", other.kind())),
        }
        Ok(self)
    }

    /// Attach a condition group, chained to the previously attached group.
    ///
    /// Accepts `&ConditionGroup` (cloned), `ConditionGroup` or a shared
    /// `Arc<ConditionGroup>`.
    pub fn add_condition(
        &mut self,
        group: impl Into<Arc<ConditionGroup>>,
        chain: Chain,
    ) -> DbResult<&mut Self> {
        let kind = self.kind();
        let conditions = self
            .statement
            .conditions_mut()
            .ok_or_else(|| DbError::state("add_condition", kind))?;
        conditions.push(AttachedCondition {
            group: group.into(),
            chain,
        });
        Ok(self)
    }

    /// Add a JOIN (SELECT, SHOW). The joined table goes through the prefix.
    pub fn join(&mut self, mut join: Join) -> DbResult<&mut Self> {
        join.table = self.prefix.apply(&join.table);
        self.select_parts("join")?.joins.push(join);
        Ok(self)
    }

    /// Add an ORDER BY term (SELECT, SHOW).
    pub fn order_by(&mut self, expr: impl Into<String>, dir: SortDir) -> DbResult<&mut Self> {
        self.select_parts("order_by")?.order_by.push(OrderBy {
            expr: expr.into(),
            dir,
        });
        Ok(self)
    }

    /// Cap the number of rows (SELECT, SHOW). `None` removes the cap.
    pub fn limit(&mut self, limit: impl Into<Option<u64>>) -> DbResult<&mut Self> {
        self.select_parts("limit")?.limit = limit.into();
        Ok(self)
    }

    fn select_parts(&mut self, operation: &'static str) -> DbResult<&mut SelectParts> {
        let kind = self.kind();
        self.statement
            .select_mut()
            .ok_or_else(|| DbError::state(operation, kind))
    }

    // ==================== Rendering ====================

    /// Render the statement without touching the builder.
    pub fn render(&self) -> DbResult<RenderedStatement> {
        self.statement.render()
    }

    /// Render the statement, keep its bound values (see
    /// [`bound_values`](Self::bound_values)) and return the SQL text.
    pub fn dump(&mut self) -> DbResult<String> {
        let rendered = self.statement.render()?;
        self.bound = rendered.values;
        Ok(rendered.sql)
    }

    /// Values bound by the last `dump` or `execute`.
    pub fn bound_values(&self) -> &ValueMap {
        &self.bound
    }

    // ==================== Execution ====================

    /// Render and run the statement on `conn`.
    ///
    /// The previous result set is discarded first. For an INSERT the
    /// connection's last insert id is recorded.
    pub fn execute<C: Connection>(&mut self, conn: &C) -> DbResult<&mut Self> {
        self.results = None;
        self.last_insert_id = None;
        let kind = self.kind();
        if kind == StatementKind::None {
            return Err(DbError::state("execute", kind));
        }
        let rendered = self.statement.render()?;
        let outcome = self.run(
            conn,
            kind.as_str(),
            &rendered.sql,
            &rendered.values,
            kind == StatementKind::Insert,
        );
        self.bound = rendered.values;
        outcome?;
        Ok(self)
    }

    /// Run raw SQL on `conn` after applying the table prefix.
    ///
    /// The SQL must not contain placeholders; the statement being built is
    /// left untouched.
    pub fn run_sql<C: Connection>(&mut self, conn: &C, sql: &str) -> DbResult<&mut Self> {
        let sql = self.prefix.apply(sql);
        let is_insert = sql
            .trim_start()
            .get(..6)
            .is_some_and(|head| head.eq_ignore_ascii_case("insert"));
        self.run(conn, "RAW", &sql, &ValueMap::new(), is_insert)?;
        Ok(self)
    }

    fn run<C: Connection>(
        &mut self,
        conn: &C,
        kind: &str,
        sql: &str,
        values: &ValueMap,
        is_insert: bool,
    ) -> DbResult<()> {
        self.results = None;
        self.last_insert_id = None;

        trace::statement_start(kind, sql, values.len());
        let rows = match fetch(conn, sql, values) {
            Ok(rows) => rows,
            Err(err) => {
                trace::statement_failed(kind, sql, &err);
                return Err(err);
            }
        };

        if is_insert {
            self.last_insert_id = conn.last_insert_id();
        }
        trace::statement_done(kind, rows.len(), self.last_insert_id);
        self.results = (!rows.is_empty()).then_some(rows);
        Ok(())
    }

    // ==================== Results ====================

    /// First row of the last execution; `None` before any execution or when
    /// it produced no rows.
    pub fn result(&self) -> Option<&Row> {
        self.results.as_ref().and_then(|rows| rows.first())
    }

    /// All rows of the last execution; `None` under the same conditions as
    /// [`result`](Self::result).
    pub fn results(&self) -> Option<&[Row]> {
        self.results.as_deref()
    }

    /// Row id assigned by the last executed INSERT, if the backend reported one.
    pub fn last_insert_id(&self) -> Option<i64> {
        self.last_insert_id
    }
}

fn fetch<C: Connection>(conn: &C, sql: &str, values: &ValueMap) -> DbResult<Vec<Row>> {
    let mut stmt = conn.prepare(sql)?;
    stmt.execute(values)?;
    stmt.fetch_all()
}
