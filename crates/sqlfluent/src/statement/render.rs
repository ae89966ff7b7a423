use super::{
    AttachedCondition, DeleteParts, InsertParts, Projection, SelectParts, Statement, StatementKind,
    Target, UpdateParts,
};
use crate::error::{DbError, DbResult};
use crate::ident::quote_column;
use crate::value::{Value, ValueMap};

/// SQL text plus the values bound to its placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedStatement {
    pub kind: StatementKind,
    pub sql: String,
    pub values: ValueMap,
}

impl Statement {
    /// Render the statement. Pure: the statement is not modified.
    pub(crate) fn render(&self) -> DbResult<RenderedStatement> {
        let mut values = ValueMap::new();
        let sql = match self {
            Statement::None => return Err(DbError::state("render", StatementKind::None)),
            Statement::Select(parts) => render_select("SELECT", parts, &mut values)?,
            Statement::Show(parts) => render_select("SHOW", parts, &mut values)?,
            Statement::Insert(parts) => render_insert(parts, &mut values)?,
            Statement::Update(parts) => render_update(parts, &mut values)?,
            Statement::Delete(parts) => render_delete(parts, &mut values)?,
        };
        Ok(RenderedStatement {
            kind: self.kind(),
            sql,
            values,
        })
    }
}

fn push_target(sql: &mut String, target: &Target) {
    sql.push_str(&target.table);
    if let Some(alias) = &target.alias {
        sql.push_str(" AS ");
        sql.push_str(alias);
    }
}

fn push_projection(sql: &mut String, projection: &[Projection]) {
    for (i, item) in projection.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push_str(&item.expr);
        if let Some(alias) = &item.alias {
            sql.push_str(" AS ");
            sql.push_str(alias);
        }
    }
}

/// Render attached groups as `(g0) CHAIN (g1) ...`, merging their values.
///
/// Group `i` is rendered with key prefix `c{i}`. Empty groups are skipped, so
/// `None` means the WHERE clause must be omitted.
fn render_conditions(
    conditions: &[AttachedCondition],
    values: &mut ValueMap,
) -> DbResult<Option<String>> {
    let mut sql = String::new();
    for (idx, attached) in conditions.iter().enumerate() {
        let rendered = attached.group.render(&format!("c{idx}"))?;
        if rendered.is_empty() {
            continue;
        }
        if !sql.is_empty() {
            sql.push(' ');
            sql.push_str(attached.chain.as_sql());
            sql.push(' ');
        }
        sql.push('(');
        sql.push_str(&rendered.sql);
        sql.push(')');
        values.try_merge(rendered.values)?;
    }
    Ok((!sql.is_empty()).then_some(sql))
}

fn push_where(
    sql: &mut String,
    conditions: &[AttachedCondition],
    values: &mut ValueMap,
) -> DbResult<()> {
    if let Some(clause) = render_conditions(conditions, values)? {
        sql.push_str(" WHERE ");
        sql.push_str(&clause);
    }
    Ok(())
}

fn render_select(keyword: &str, parts: &SelectParts, values: &mut ValueMap) -> DbResult<String> {
    if parts.projection.is_empty() {
        return Err(DbError::render(format!("{keyword} requires at least one projection item")));
    }

    let mut sql = String::from(keyword);
    sql.push(' ');
    push_projection(&mut sql, &parts.projection);

    if let Some(target) = &parts.target {
        sql.push_str(" FROM ");
        push_target(&mut sql, target);
    }

    for join in &parts.joins {
        sql.push(' ');
        sql.push_str(join.kind.as_sql());
        sql.push(' ');
        sql.push_str(&join.table);
        if let Some(alias) = &join.alias {
            sql.push_str(" AS ");
            sql.push_str(alias);
        }
        if join.kind != super::JoinKind::Cross {
            sql.push_str(" ON ");
            sql.push_str(&join.on);
        }
    }

    push_where(&mut sql, &parts.conditions, values)?;

    if !parts.order_by.is_empty() {
        sql.push_str(" ORDER BY ");
        for (i, order) in parts.order_by.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str(&order.expr);
            sql.push(' ');
            sql.push_str(order.dir.as_sql());
        }
    }

    if let Some(limit) = parts.limit {
        sql.push_str(&format!(" LIMIT {limit}"));
    }

    sql.push(';');
    Ok(sql)
}

fn render_insert(parts: &InsertParts, values: &mut ValueMap) -> DbResult<String> {
    let target = parts
        .target
        .as_deref()
        .ok_or_else(|| DbError::render("INSERT requires a target table (call `insert_into`)"))?;
    let first = parts
        .rows
        .first()
        .ok_or_else(|| DbError::render("INSERT requires at least one row"))?;
    if first.is_empty() {
        return Err(DbError::render("INSERT row has no columns"));
    }

    let columns: Vec<&str> = first.keys().collect();
    let mut row_sql = Vec::with_capacity(parts.rows.len());

    for (r, row) in parts.rows.iter().enumerate() {
        if !row.same_keys(first) {
            return Err(DbError::render(format!(
                "INSERT row {r} has columns [{}], expected [{}]",
                row.keys().collect::<Vec<_>>().join(", "),
                columns.join(", ")
            )));
        }
        let mut placeholders = Vec::with_capacity(columns.len());
        for (c, column) in columns.iter().enumerate() {
            let key = format!("p{r}c{c}");
            let value = row.get(column).cloned().unwrap_or(Value::Null);
            placeholders.push(format!(":{key}"));
            values.insert(key, value);
        }
        row_sql.push(format!("({})", placeholders.join(", ")));
    }

    let column_list = columns
        .iter()
        .map(|c| quote_column(c))
        .collect::<Vec<_>>()
        .join(", ");

    Ok(format!(
        "INSERT INTO {target} ({column_list}) VALUES {};",
        row_sql.join(", ")
    ))
}

/// Placeholder key for an assignment: the column name with every character
/// that is not valid in a `:name` placeholder replaced by `_`.
fn assignment_key(column: &str) -> String {
    column
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

fn render_update(parts: &UpdateParts, values: &mut ValueMap) -> DbResult<String> {
    if parts.assignments.is_empty() {
        return Err(DbError::render("UPDATE requires at least one SET assignment"));
    }

    let mut sql = format!("UPDATE {} SET ", parts.target);
    let mut assignments = ValueMap::new();
    for (i, (column, value)) in parts.assignments.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        let key = assignment_key(column);
        sql.push_str(&format!("{}=:{key}", quote_column(column)));
        if assignments.contains_key(&key) {
            return Err(DbError::render(format!(
                "UPDATE assignments map two columns to parameter key `{key}`"
            )));
        }
        assignments.insert(key, value.clone());
    }
    values.try_merge(assignments)?;

    push_where(&mut sql, &parts.conditions, values)?;
    sql.push(';');
    Ok(sql)
}

fn render_delete(parts: &DeleteParts, values: &mut ValueMap) -> DbResult<String> {
    let target = parts
        .target
        .as_ref()
        .ok_or_else(|| DbError::render("DELETE requires a target table (call `from`)"))?;

    let mut sql = String::from("DELETE FROM ");
    push_target(&mut sql, target);
    push_where(&mut sql, &parts.conditions, values)?;
    sql.push(';');
    Ok(sql)
}
