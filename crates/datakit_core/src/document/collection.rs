//! Collection handle boundary and the bundled in-process collection.
//!
//! # Responsibility
//! - Define the minimal driver surface `DocumentStore` depends on.
//! - Provide `MemoryCollection`, an insertion-ordered implementation used
//!   for embedded deployments and tests.
//!
//! # Invariants
//! - `MemoryCollection` rejects documents without a string `_id` and
//!   rejects duplicate `_id` values.
//! - Writes take the collection's exclusive lock; reads take the shared lock.

use super::filter::{compare_values, field_at, Filter, FindOptions, SortOrder};
use super::{DocError, DocResult, ID_FIELD};
use crate::config::DocumentConfig;
use log::debug;
use serde_json::Value;
use std::sync::{PoisonError, RwLock};

/// Result of a single-document replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

/// Driver operations on one document collection.
pub trait Collection {
    /// Fully qualified collection name, for diagnostics.
    fn name(&self) -> &str;
    fn insert_one(&self, document: Value) -> DocResult<()>;
    /// Returns every matching document; an empty filter matches all.
    fn find(&self, filter: &Filter, options: &FindOptions) -> DocResult<Vec<Value>>;
    /// Replaces the first matching document with `replacement`.
    fn update_one(&self, filter: &Filter, replacement: Value) -> DocResult<UpdateOutcome>;
    /// Deletes the first matching document and returns how many were removed.
    fn delete_one(&self, filter: &Filter) -> DocResult<u64>;
    fn drop_collection(&self) -> DocResult<()>;
    /// Fast, possibly approximate, document count.
    fn estimated_count(&self) -> DocResult<u64>;
}

/// Process-local collection kept in insertion order.
pub struct MemoryCollection {
    name: String,
    documents: RwLock<Vec<Value>>,
}

impl MemoryCollection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: RwLock::new(Vec::new()),
        }
    }

    /// Names the collection `<database>.<collection>`.
    pub fn from_config(config: &DocumentConfig) -> Self {
        Self::new(format!("{}.{}", config.database, config.collection))
    }
}

impl Collection for MemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    fn insert_one(&self, document: Value) -> DocResult<()> {
        let key = match document.get(ID_FIELD) {
            Some(Value::String(key)) => key.clone(),
            _ => {
                return Err(DocError::InvalidDocument(format!(
                    "`{ID_FIELD}` must be a string"
                )))
            }
        };

        let mut documents = self
            .documents
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if documents
            .iter()
            .any(|existing| existing.get(ID_FIELD) == document.get(ID_FIELD))
        {
            return Err(DocError::DuplicateKey(key));
        }
        documents.push(document);
        Ok(())
    }

    fn find(&self, filter: &Filter, options: &FindOptions) -> DocResult<Vec<Value>> {
        let documents = self.documents.read().unwrap_or_else(PoisonError::into_inner);
        let mut matched: Vec<Value> = documents
            .iter()
            .filter(|document| filter.matches(document))
            .cloned()
            .collect();
        drop(documents);

        if let Some((path, order)) = &options.sort {
            matched.sort_by(|a, b| {
                let ordering = compare_values(field_at(a, path), field_at(b, path));
                match order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            });
        }

        let skip = usize::try_from(options.skip).unwrap_or(usize::MAX);
        let limit = options
            .limit
            .map_or(usize::MAX, |limit| usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(matched.into_iter().skip(skip).take(limit).collect())
    }

    fn update_one(&self, filter: &Filter, replacement: Value) -> DocResult<UpdateOutcome> {
        let mut documents = self
            .documents
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let Some(slot) = documents.iter_mut().find(|document| filter.matches(document)) else {
            return Ok(UpdateOutcome {
                matched: 0,
                modified: 0,
            });
        };

        let modified = u64::from(*slot != replacement);
        *slot = replacement;
        Ok(UpdateOutcome {
            matched: 1,
            modified,
        })
    }

    fn delete_one(&self, filter: &Filter) -> DocResult<u64> {
        let mut documents = self
            .documents
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        match documents.iter().position(|document| filter.matches(document)) {
            Some(index) => {
                documents.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn drop_collection(&self) -> DocResult<()> {
        let mut documents = self
            .documents
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        debug!(
            "event=collection_drop module=document collection={} removed={}",
            self.name,
            documents.len()
        );
        documents.clear();
        Ok(())
    }

    fn estimated_count(&self) -> DocResult<u64> {
        let documents = self.documents.read().unwrap_or_else(PoisonError::into_inner);
        Ok(documents.len() as u64)
    }
}
