//! Parameterized statement builder.
//!
//! Statements use numbered placeholders (`?1`, `?2`, ...) in the order of
//! `Statement::args`.

use super::{SqlError, SqlResult};
use crate::model::Params;
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::types::Value;

static IDENTIFIER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex")
});

/// Comparison operator for `where_cmp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Like,
}

impl Cmp {
    fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Like => "LIKE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

/// Composable SELECT modifier.
///
/// Multiple `Where` options are joined with `AND`; `OrderBy` options apply
/// in the given order; the last `Limit`/`Offset` wins.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOption {
    Where {
        column: String,
        cmp: Cmp,
        value: Value,
    },
    OrderBy {
        column: String,
        order: Order,
    },
    Limit(u32),
    Offset(u32),
}

pub fn where_eq(column: impl Into<String>, value: impl Into<Value>) -> QueryOption {
    where_cmp(column, Cmp::Eq, value)
}

pub fn where_cmp(column: impl Into<String>, cmp: Cmp, value: impl Into<Value>) -> QueryOption {
    QueryOption::Where {
        column: column.into(),
        cmp,
        value: value.into(),
    }
}

pub fn order_by(column: impl Into<String>, order: Order) -> QueryOption {
    QueryOption::OrderBy {
        column: column.into(),
        order,
    }
}

pub fn limit(count: u32) -> QueryOption {
    QueryOption::Limit(count)
}

pub fn offset(count: u32) -> QueryOption {
    QueryOption::Offset(count)
}

/// SQL text plus its positional arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub args: Vec<Value>,
}

impl Statement {
    fn new() -> Self {
        Self {
            sql: String::new(),
            args: Vec::new(),
        }
    }

    /// Binds `value` and returns its placeholder.
    fn bind(&mut self, value: Value) -> String {
        self.args.push(value);
        format!("?{}", self.args.len())
    }
}

/// Fails unless `name` is a plain SQL identifier.
pub fn validate_identifier(name: &str) -> SqlResult<()> {
    if IDENTIFIER_RE.is_match(name) {
        Ok(())
    } else {
        Err(SqlError::InvalidQuery(format!(
            "`{name}` is not a valid identifier"
        )))
    }
}

/// `INSERT INTO table (cols) VALUES (...) RETURNING returning`.
///
/// Empty `params` insert a row of column defaults.
pub fn insert(table: &str, params: &Params, returning: &str) -> SqlResult<Statement> {
    validate_identifier(table)?;
    validate_identifier(returning)?;

    let mut stmt = Statement::new();
    if params.is_empty() {
        stmt.sql = format!("INSERT INTO {table} DEFAULT VALUES RETURNING {returning}");
        return Ok(stmt);
    }

    let mut columns = Vec::with_capacity(params.len());
    let mut placeholders = Vec::with_capacity(params.len());
    for (column, value) in params {
        validate_identifier(column)?;
        columns.push(*column);
        placeholders.push(stmt.bind(value.clone()));
    }

    stmt.sql = format!(
        "INSERT INTO {table} ({}) VALUES ({}) RETURNING {returning}",
        columns.join(", "),
        placeholders.join(", ")
    );
    Ok(stmt)
}

/// `UPDATE table SET col = ?, ... WHERE key_column = ?`.
pub fn update(table: &str, params: &Params, key_column: &str, key: Value) -> SqlResult<Statement> {
    validate_identifier(table)?;
    validate_identifier(key_column)?;
    if params.is_empty() {
        return Err(SqlError::InvalidQuery(format!(
            "nothing to update in `{table}`: model has no params"
        )));
    }

    let mut stmt = Statement::new();
    let mut assignments = Vec::with_capacity(params.len());
    for (column, value) in params {
        validate_identifier(column)?;
        let placeholder = stmt.bind(value.clone());
        assignments.push(format!("{column} = {placeholder}"));
    }
    let key_placeholder = stmt.bind(key);

    stmt.sql = format!(
        "UPDATE {table} SET {} WHERE {key_column} = {key_placeholder}",
        assignments.join(", ")
    );
    Ok(stmt)
}

/// `DELETE FROM table WHERE key_column = ?`.
pub fn delete(table: &str, key_column: &str, key: Value) -> SqlResult<Statement> {
    validate_identifier(table)?;
    validate_identifier(key_column)?;

    let mut stmt = Statement::new();
    let key_placeholder = stmt.bind(key);
    stmt.sql = format!("DELETE FROM {table} WHERE {key_column} = {key_placeholder}");
    Ok(stmt)
}

/// `SELECT columns FROM table [WHERE ...] [ORDER BY ...] [LIMIT ? OFFSET ?]`.
pub fn select(table: &str, columns: &[&str], opts: &[QueryOption]) -> SqlResult<Statement> {
    validate_identifier(table)?;
    if columns.is_empty() {
        return Err(SqlError::InvalidQuery(
            "select requires at least one column".to_string(),
        ));
    }
    for column in columns {
        if *column != "*" {
            validate_identifier(column)?;
        }
    }

    let mut stmt = Statement::new();
    let mut predicates = Vec::new();
    let mut ordering = Vec::new();
    let mut row_limit = None;
    let mut row_offset = None;

    for opt in opts {
        match opt {
            QueryOption::Where { column, cmp, value } => {
                validate_identifier(column)?;
                let placeholder = stmt.bind(value.clone());
                predicates.push(format!("{column} {} {placeholder}", cmp.as_sql()));
            }
            QueryOption::OrderBy { column, order } => {
                validate_identifier(column)?;
                let direction = match order {
                    Order::Asc => "ASC",
                    Order::Desc => "DESC",
                };
                ordering.push(format!("{column} {direction}"));
            }
            QueryOption::Limit(count) => row_limit = Some(*count),
            QueryOption::Offset(count) => row_offset = Some(*count),
        }
    }

    let mut sql = format!("SELECT {} FROM {table}", columns.join(", "));
    if !predicates.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&predicates.join(" AND "));
    }
    if !ordering.is_empty() {
        sql.push_str(" ORDER BY ");
        sql.push_str(&ordering.join(", "));
    }
    match (row_limit, row_offset) {
        (Some(count), Some(skip)) => {
            let limit_placeholder = stmt.bind(Value::Integer(i64::from(count)));
            let offset_placeholder = stmt.bind(Value::Integer(i64::from(skip)));
            sql.push_str(&format!(
                " LIMIT {limit_placeholder} OFFSET {offset_placeholder}"
            ));
        }
        (Some(count), None) => {
            let limit_placeholder = stmt.bind(Value::Integer(i64::from(count)));
            sql.push_str(&format!(" LIMIT {limit_placeholder}"));
        }
        (None, Some(skip)) => {
            let offset_placeholder = stmt.bind(Value::Integer(i64::from(skip)));
            sql.push_str(&format!(" LIMIT -1 OFFSET {offset_placeholder}"));
        }
        (None, None) => {}
    }

    stmt.sql = sql;
    Ok(stmt)
}
