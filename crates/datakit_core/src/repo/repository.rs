//! Backend-agnostic CRUD contract and its error type.
//!
//! # Responsibility
//! - Define the `Repository<T>` trait shared by every id-owning backend.
//! - Keep not-found distinct from I/O and encoding failures.
//!
//! # Invariants
//! - Identifiers are assigned by the backend and never reused or changed.
//! - `get_all` returns entities in ascending identifier order.

use crate::collection::Array;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Backend-assigned entity identifier.
pub type EntityId = u64;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error returned by repository operations.
#[derive(Debug)]
pub enum RepoError {
    NotFound(EntityId),
    /// Every identifier up to `EntityId::MAX` has been allocated.
    IdsExhausted,
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "entity not found: {id}"),
            Self::IdsExhausted => write!(f, "entity identifiers exhausted"),
            Self::Io(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "invalid entity encoding: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) | Self::IdsExhausted => None,
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for RepoError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl RepoError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// CRUD contract implemented by the in-memory and file backends.
pub trait Repository<T> {
    /// Stores `entity` under a fresh identifier and returns it.
    fn create(&self, entity: T) -> RepoResult<EntityId>;
    /// Replaces the entity stored under `id`.
    fn update(&self, id: EntityId, entity: T) -> RepoResult<()>;
    /// Loads the entity stored under `id`.
    fn get(&self, id: EntityId) -> RepoResult<T>;
    /// Loads every live entity.
    fn get_all(&self) -> RepoResult<Array<T>>;
    /// Removes the entity stored under `id`.
    fn delete(&self, id: EntityId) -> RepoResult<()>;
}
