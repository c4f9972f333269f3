//! Generic document engine over a collection handle.
//!
//! # Responsibility
//! - Map serde-serializable entities to JSON documents keyed by `_id`.
//! - Keep the store driver behind the narrow `Collection` trait.
//!
//! # Invariants
//! - Every stored document is a JSON object with a uuid string `_id`.
//! - Targeted operations (`search`, `delete`) reject empty filters before
//!   any collection call.
//! - A missing document is `DocError::NotFound`, never a transport error.

use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod collection;
pub mod filter;
mod store;

pub use collection::{Collection, MemoryCollection, UpdateOutcome};
pub use filter::{Filter, FindOptions, SortOrder};
pub use store::DocumentStore;

/// Identifier stored in each document's `_id` field.
pub type DocumentId = Uuid;

/// Field holding the document identifier.
pub const ID_FIELD: &str = "_id";

pub type DocResult<T> = Result<T, DocError>;

/// Error returned by the document engine and collection handles.
#[derive(Debug)]
pub enum DocError {
    NotFound(DocumentId),
    InvalidFilter(String),
    InvalidDocument(String),
    DuplicateKey(String),
    Json(serde_json::Error),
    Backend(String),
}

impl Display for DocError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "document not found: {id}"),
            Self::InvalidFilter(message) => write!(f, "invalid filter: {message}"),
            Self::InvalidDocument(message) => write!(f, "invalid document: {message}"),
            Self::DuplicateKey(key) => write!(f, "duplicate document key: {key}"),
            Self::Json(err) => write!(f, "document encoding failed: {err}"),
            Self::Backend(message) => write!(f, "document store error: {message}"),
        }
    }
}

impl Error for DocError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::NotFound(_)
            | Self::InvalidFilter(_)
            | Self::InvalidDocument(_)
            | Self::DuplicateKey(_)
            | Self::Backend(_) => None,
        }
    }
}

impl From<serde_json::Error> for DocError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
