//! Entity-mapping protocol for the relational engine.
//!
//! # Responsibility
//! - Let any record type describe its primary key, its persistable columns
//!   and how to bind result columns back onto itself.
//! - Report column/field mismatches as mapping errors.
//!
//! # Invariants
//! - `params()` never contains the primary-key column.
//! - Every key of `params()` names a column the backing table has.
//! - `scan()` binds by column name, never by position, and accepts any
//!   subset of its declared columns in any order.

use rusqlite::types::{FromSql, Value};
use rusqlite::Row;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Persistable column values keyed by column name.
pub type Params = BTreeMap<&'static str, Value>;

pub type MappingResult<T> = Result<T, MappingError>;

/// A model's declared columns disagree with what the store returned.
#[derive(Debug)]
pub enum MappingError {
    /// The result set carried a column the model does not declare.
    UnknownColumn(String),
    /// A declared column held a value of an incompatible type.
    Column {
        column: String,
        source: rusqlite::Error,
    },
}

impl Display for MappingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownColumn(column) => write!(f, "model has no field for column `{column}`"),
            Self::Column { column, source } => {
                write!(f, "failed to bind column `{column}`: {source}")
            }
        }
    }
}

impl Error for MappingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UnknownColumn(_) => None,
            Self::Column { source, .. } => Some(source),
        }
    }
}

/// Record type that the generic SQL engine can persist.
///
/// # Example
/// ```
/// use datakit_core::model::{scan_column, MappingError, MappingResult, Model, Params};
/// use rusqlite::types::Value;
/// use rusqlite::Row;
///
/// #[derive(Default)]
/// struct Tag {
///     id: i64,
///     name: String,
/// }
///
/// impl Model for Tag {
///     fn primary(&self) -> (&'static str, Value) {
///         ("id", Value::Integer(self.id))
///     }
///
///     fn scan(&mut self, fields: &[String], row: &Row<'_>) -> MappingResult<()> {
///         for (idx, field) in fields.iter().enumerate() {
///             match field.as_str() {
///                 "id" => self.id = scan_column(row, idx, field)?,
///                 "name" => self.name = scan_column(row, idx, field)?,
///                 other => return Err(MappingError::UnknownColumn(other.to_string())),
///             }
///         }
///         Ok(())
///     }
///
///     fn params(&self) -> Params {
///         Params::from([("name", Value::Text(self.name.clone()))])
///     }
/// }
/// ```
pub trait Model {
    /// Returns the primary-key column name and the current key value.
    ///
    /// An unassigned key is reported as `Value::Null` or the type's zero.
    fn primary(&self) -> (&'static str, Value);

    /// Binds the result columns named in `fields` onto `self`.
    ///
    /// `fields[i]` names the column at index `i` of `row`.
    fn scan(&mut self, fields: &[String], row: &Row<'_>) -> MappingResult<()>;

    /// Returns every persistable column except the primary key.
    fn params(&self) -> Params;
}

/// Reads column `idx` from `row`, tagging failures with the column name.
pub fn scan_column<T: FromSql>(row: &Row<'_>, idx: usize, column: &str) -> MappingResult<T> {
    row.get(idx).map_err(|source| MappingError::Column {
        column: column.to_string(),
        source,
    })
}
