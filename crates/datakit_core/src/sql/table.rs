//! Generic CRUD engine binding a `Model` to one SQLite table.
//!
//! # Responsibility
//! - Build statements through `query` and bind their args positionally.
//! - Scan result rows into fresh models by column name.
//!
//! # Invariants
//! - The table name is validated once, in `try_new`.
//! - `update`/`delete` that change no row are `SqlError::NotFound`.
//! - A row that fails to scan aborts the whole read.

use super::query::{self, QueryOption, Statement};
use super::{display_value, SqlError, SqlResult};
use crate::collection::Array;
use crate::model::Model;
use log::{debug, error};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Statement as Prepared};

/// Generic CRUD access to one table for any `Model` type.
pub struct SqlTable<'conn, M> {
    conn: &'conn Connection,
    table: String,
    new: fn() -> M,
}

impl<'conn, M: Model> SqlTable<'conn, M> {
    /// Binds `table` on `conn`; `new` builds the blank model each row is
    /// scanned into.
    ///
    /// # Errors
    /// - Returns `SqlError::InvalidQuery` when `table` is not a plain
    ///   identifier.
    pub fn try_new(
        conn: &'conn Connection,
        table: impl Into<String>,
        new: fn() -> M,
    ) -> SqlResult<Self> {
        let table = table.into();
        query::validate_identifier(&table)?;
        Ok(Self {
            conn,
            table,
            new,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Inserts `model` and scans the returned primary key back into it.
    ///
    /// Returns the primary-key value, or `None` when the store produced no
    /// row for the insert.
    pub fn create(&self, model: &mut M) -> SqlResult<Option<Value>> {
        let (primary, _) = model.primary();
        let stmt = query::insert(&self.table, &model.params(), primary)?;
        debug!("event=sql_create module=sql table={} sql={}", self.table, stmt.sql);

        let mut prepared = self.conn.prepare(&stmt.sql)?;
        let fields = column_names(&prepared);
        let mut rows = prepared.query(params_from_iter(stmt.args.iter()))?;

        let Some(row) = rows.next()? else {
            debug!("event=sql_create module=sql table={} status=no_key", self.table);
            return Ok(None);
        };
        model.scan(&fields, row)?;

        let (_, key) = model.primary();
        Ok(Some(key))
    }

    /// Writes every param of `model` to the row matching its primary key.
    pub fn update(&self, model: &M) -> SqlResult<()> {
        let (column, key) = model.primary();
        let stmt = query::update(&self.table, &model.params(), column, key.clone())?;
        self.execute_keyed(&stmt, &key)
    }

    /// Deletes the row matching `model`'s primary key.
    pub fn delete(&self, model: &M) -> SqlResult<()> {
        let (column, key) = model.primary();
        let stmt = query::delete(&self.table, column, key.clone())?;
        self.execute_keyed(&stmt, &key)
    }

    /// Returns the first row matching `opts`, or `None` when nothing matches.
    pub fn get(&self, opts: &[QueryOption]) -> SqlResult<Option<M>> {
        let stmt = query::select(&self.table, &["*"], opts)?;
        Ok(self.fetch(&stmt, true)?.pop())
    }

    /// Returns every row matching `opts`, scanning only `columns`.
    pub fn select(&self, columns: &[&str], opts: &[QueryOption]) -> SqlResult<Array<M>> {
        let stmt = query::select(&self.table, columns, opts)?;
        self.fetch(&stmt, false)
    }

    /// Returns every row matching `opts` with all columns.
    pub fn all(&self, opts: &[QueryOption]) -> SqlResult<Array<M>> {
        self.select(&["*"], opts)
    }

    fn execute_keyed(&self, stmt: &Statement, key: &Value) -> SqlResult<()> {
        debug!("event=sql_exec module=sql table={} sql={}", self.table, stmt.sql);
        let changed = self
            .conn
            .execute(&stmt.sql, params_from_iter(stmt.args.iter()))?;

        if changed == 0 {
            return Err(SqlError::NotFound {
                table: self.table.clone(),
                key: display_value(key),
            });
        }
        Ok(())
    }

    fn fetch(&self, stmt: &Statement, first_only: bool) -> SqlResult<Array<M>> {
        debug!("event=sql_select module=sql table={} sql={}", self.table, stmt.sql);
        let mut prepared = self.conn.prepare(&stmt.sql)?;
        let fields = column_names(&prepared);
        let mut rows = prepared.query(params_from_iter(stmt.args.iter()))?;
        let mut models = Array::new();

        while let Some(row) = rows.next()? {
            let mut model = (self.new)();
            if let Err(err) = model.scan(&fields, row) {
                error!(
                    "event=sql_select module=sql table={} status=error error_code=scan_failed error={}",
                    self.table, err
                );
                return Err(err.into());
            }
            models.push(model);
            if first_only {
                break;
            }
        }

        Ok(models)
    }
}

fn column_names(prepared: &Prepared<'_>) -> Vec<String> {
    prepared
        .column_names()
        .into_iter()
        .map(str::to_string)
        .collect()
}
