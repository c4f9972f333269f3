//! Generic relational engine over `Model` types.
//!
//! # Responsibility
//! - Build parameterized INSERT/UPDATE/DELETE/SELECT statements from a
//!   model's declared params and primary key.
//! - Rehydrate result rows through `Model::scan`.
//!
//! # Invariants
//! - Values are always bound as positional parameters, never inlined.
//! - Table and column names are validated before any statement runs.
//! - A missing row on `get` is `Ok(None)`, not an error.

use crate::db::DbError;
use crate::model::MappingError;
use rusqlite::types::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod query;
mod table;

pub use query::{Cmp, Order, QueryOption, Statement};
pub use table::SqlTable;

pub type SqlResult<T> = Result<T, SqlError>;

/// Error returned by the relational engine.
#[derive(Debug)]
pub enum SqlError {
    Db(DbError),
    Mapping(MappingError),
    InvalidQuery(String),
    NotFound { table: String, key: String },
}

impl Display for SqlError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Mapping(err) => write!(f, "{err}"),
            Self::InvalidQuery(message) => write!(f, "invalid query: {message}"),
            Self::NotFound { table, key } => write!(f, "no row in `{table}` with key {key}"),
        }
    }
}

impl Error for SqlError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Mapping(err) => Some(err),
            Self::InvalidQuery(_) => None,
            Self::NotFound { .. } => None,
        }
    }
}

impl From<DbError> for SqlError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SqlError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<MappingError> for SqlError {
    fn from(value: MappingError) -> Self {
        Self::Mapping(value)
    }
}

/// Renders a key value for error messages and log lines.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Integer(number) => number.to_string(),
        Value::Real(number) => number.to_string(),
        Value::Text(text) => format!("'{text}'"),
        Value::Blob(bytes) => format!("<{} bytes>", bytes.len()),
    }
}
