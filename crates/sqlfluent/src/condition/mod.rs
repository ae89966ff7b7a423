//! Condition groups for WHERE clauses.
//!
//! A [`ConditionGroup`] accumulates predicate fragments, each chained to the
//! previous one with AND/OR, and renders them on demand into a WHERE fragment
//! plus the values bound to its placeholders:
//!
//! ```
//! use sqlfluent::ConditionGroup;
//!
//! let mut group = ConditionGroup::new();
//! group.gt("age", 18).eq("city", "NY");
//!
//! let rendered = group.render("c0")?;
//! assert_eq!(rendered.sql, "age>:c0p0 AND city=:c0p1");
//! assert_eq!(rendered.values.len(), 2);
//! # Ok::<(), sqlfluent::DbError>(())
//! ```
//!
//! Placeholder keys are `{prefix}p{entry index}`, so the same group rendered
//! with two different prefixes yields disjoint key sets. Raw fragments embed
//! their own placeholder names; keeping those unique is up to the caller.

use crate::error::{DbError, DbResult};
use crate::ident::quote_column;
use crate::value::{Value, ValueMap};
use std::fmt;

/// Boolean operator joining a fragment (or group) to the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Chain {
    #[default]
    And,
    Or,
}

impl Chain {
    pub fn as_sql(self) -> &'static str {
        match self {
            Chain::And => "AND",
            Chain::Or => "OR",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Comparison operator of a column condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Comparator {
    /// `=`
    #[default]
    Eq,
    /// `!=`
    Ne,
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// `IN (...)`
    In,
    /// `NOT IN (...)`
    NotIn,
}

impl Comparator {
    pub fn as_sql(self) -> &'static str {
        match self {
            Comparator::Eq => "=",
            Comparator::Ne => "!=",
            Comparator::Gt => ">",
            Comparator::Gte => ">=",
            Comparator::Lt => "<",
            Comparator::Lte => "<=",
            Comparator::In => "IN",
            Comparator::NotIn => "NOT IN",
        }
    }

    /// Returns `true` for IN / NOT IN.
    pub fn is_list(self) -> bool {
        matches!(self, Comparator::In | Comparator::NotIn)
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Fragment {
    /// Literal predicate text carrying its own placeholder names.
    Raw { sql: String, values: ValueMap },
    /// `column <comparator> :key`
    Column {
        column: String,
        comparator: Comparator,
        value: Value,
    },
}

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    chain: Chain,
    fragment: Fragment,
}

/// The output of [`ConditionGroup::render`].
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedCondition {
    /// Predicate text, without the WHERE keyword and without outer parentheses.
    pub sql: String,
    /// Values for every placeholder in `sql`, in placeholder order.
    pub values: ValueMap,
}

impl RenderedCondition {
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }
}

/// A reusable set of chained predicates.
///
/// Groups own no connection and are never mutated by rendering, so one group
/// can be attached to several statements (see
/// [`StatementBuilder::add_condition`](crate::StatementBuilder::add_condition)).
#[derive(Debug, Clone, Default)]
pub struct ConditionGroup {
    entries: Vec<Entry>,
}

impl ConditionGroup {
    /// Create an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if any fragments have been added.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of fragments.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // ==================== Raw fragments ====================

    /// Append a raw predicate with its placeholder values.
    ///
    /// The text is used verbatim; `values` keys must match the `:name`
    /// placeholders in `sql` and must not clash with any other key bound by
    /// the statement.
    pub fn add_raw(&mut self, sql: impl Into<String>, values: ValueMap, chain: Chain) -> &mut Self {
        self.entries.push(Entry {
            chain,
            fragment: Fragment::Raw {
                sql: sql.into(),
                values,
            },
        });
        self
    }

    /// Append a raw predicate chained with AND.
    pub fn and_raw(&mut self, sql: impl Into<String>, values: ValueMap) -> &mut Self {
        self.add_raw(sql, values, Chain::And)
    }

    /// Append a raw predicate chained with OR.
    pub fn or_raw(&mut self, sql: impl Into<String>, values: ValueMap) -> &mut Self {
        self.add_raw(sql, values, Chain::Or)
    }

    // ==================== Column fragments ====================

    /// Append a `column <comparator> value` fragment.
    pub fn add_column(
        &mut self,
        column: impl Into<String>,
        value: impl Into<Value>,
        comparator: Comparator,
        chain: Chain,
    ) -> &mut Self {
        self.entries.push(Entry {
            chain,
            fragment: Fragment::Column {
                column: column.into(),
                comparator,
                value: value.into(),
            },
        });
        self
    }

    /// Append a column fragment chained with AND.
    pub fn and_where(
        &mut self,
        column: impl Into<String>,
        comparator: Comparator,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.add_column(column, value, comparator, Chain::And)
    }

    /// Append a column fragment chained with OR.
    pub fn or_where(
        &mut self,
        column: impl Into<String>,
        comparator: Comparator,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.add_column(column, value, comparator, Chain::Or)
    }

    /// AND column = value
    pub fn eq(&mut self, column: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.and_where(column, Comparator::Eq, value)
    }

    /// AND column != value
    pub fn ne(&mut self, column: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.and_where(column, Comparator::Ne, value)
    }

    /// AND column > value
    pub fn gt(&mut self, column: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.and_where(column, Comparator::Gt, value)
    }

    /// AND column >= value
    pub fn gte(&mut self, column: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.and_where(column, Comparator::Gte, value)
    }

    /// AND column < value
    pub fn lt(&mut self, column: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.and_where(column, Comparator::Lt, value)
    }

    /// AND column <= value
    pub fn lte(&mut self, column: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.and_where(column, Comparator::Lte, value)
    }

    /// AND column IN (values...)
    pub fn in_list(&mut self, column: impl Into<String>, values: impl Into<Value>) -> &mut Self {
        self.and_where(column, Comparator::In, values)
    }

    /// AND column NOT IN (values...)
    pub fn not_in(&mut self, column: impl Into<String>, values: impl Into<Value>) -> &mut Self {
        self.and_where(column, Comparator::NotIn, values)
    }

    /// OR column = value
    pub fn or_eq(&mut self, column: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.or_where(column, Comparator::Eq, value)
    }

    // ==================== Rendering ====================

    /// Render the group with placeholder keys namespaced by `prefix`.
    ///
    /// Fragments are joined by their own chain operator; the first fragment's
    /// chain is not emitted. An empty group renders to an empty string and no
    /// values. Rendering never mutates the group: calling it twice with the
    /// same prefix yields identical output.
    ///
    /// Fails with [`DbError::Render`] when a list value is used with a scalar
    /// comparator or when two fragments bind the same key.
    pub fn render(&self, prefix: &str) -> DbResult<RenderedCondition> {
        let mut sql = String::new();
        let mut values = ValueMap::new();

        for (idx, entry) in self.entries.iter().enumerate() {
            if idx > 0 {
                sql.push(' ');
                sql.push_str(entry.chain.as_sql());
                sql.push(' ');
            }
            match &entry.fragment {
                Fragment::Raw {
                    sql: raw,
                    values: raw_values,
                } => {
                    sql.push_str(raw);
                    values.try_merge(raw_values.clone())?;
                }
                Fragment::Column {
                    column,
                    comparator,
                    value,
                } => {
                    let key = format!("{prefix}p{idx}");
                    let (text, bound) = render_column(column, *comparator, value, &key)?;
                    sql.push_str(&text);
                    values.try_merge(bound)?;
                }
            }
        }

        Ok(RenderedCondition { sql, values })
    }
}

fn render_column(
    column: &str,
    comparator: Comparator,
    value: &Value,
    key: &str,
) -> DbResult<(String, ValueMap)> {
    let col = quote_column(column);
    let mut bound = ValueMap::new();

    if !comparator.is_list() {
        if matches!(value, Value::List(_)) {
            return Err(DbError::render(format!(
                "list value for `{column}` requires IN or NOT IN, got `{comparator}`"
            )));
        }
        bound.insert(key, value.clone());
        return Ok((format!("{col}{comparator}:{key}"), bound));
    }

    match value {
        // Empty IN list - always false / true
        Value::List(items) if items.is_empty() => {
            let sql = if comparator == Comparator::In { "1=0" } else { "1=1" };
            Ok((sql.to_string(), bound))
        }
        Value::List(items) => {
            let mut placeholders = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let item_key = format!("{key}_{i}");
                placeholders.push(format!(":{item_key}"));
                bound.insert(item_key, item.clone());
            }
            Ok((
                format!("{col} {comparator} ({})", placeholders.join(", ")),
                bound,
            ))
        }
        scalar => {
            bound.insert(key, scalar.clone());
            Ok((format!("{col} {comparator} (:{key})"), bound))
        }
    }
}

impl From<&ConditionGroup> for std::sync::Arc<ConditionGroup> {
    fn from(group: &ConditionGroup) -> Self {
        std::sync::Arc::new(group.clone())
    }
}
