//! SQLite connection bootstrap for the relational backend.
//!
//! # Responsibility
//! - Open and configure SQLite connections from an explicit `SqlConfig`.
//! - Wrap driver failures in one transport-level error type.
//!
//! # Invariants
//! - Returned connections have the configured `foreign_keys` and
//!   `busy_timeout` pragmas applied.
//! - Schema creation is the caller's responsibility.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Transport-level failure reported by the SQLite driver.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
