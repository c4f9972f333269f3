//! Typed document store over a `Collection` handle.
//!
//! # Responsibility
//! - Encode entities as JSON objects and decode results back.
//! - Own `_id` assignment for inserts and updates.
//!
//! # Invariants
//! - `search` and `delete` never reach the collection with an empty filter.
//! - An `update` that matches nothing is `DocError::NotFound`.

use super::collection::{Collection, UpdateOutcome};
use super::filter::{Filter, FindOptions};
use super::{DocError, DocResult, DocumentId, ID_FIELD};
use crate::collection::Array;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;
use uuid::Uuid;

/// Typed document access over one collection handle.
pub struct DocumentStore<T, C> {
    collection: C,
    _document: PhantomData<fn() -> T>,
}

impl<T, C> DocumentStore<T, C>
where
    T: Serialize + DeserializeOwned,
    C: Collection,
{
    pub fn new(collection: C) -> Self {
        Self {
            collection,
            _document: PhantomData,
        }
    }

    pub fn collection(&self) -> &C {
        &self.collection
    }

    /// Inserts `document` and returns its `_id`.
    ///
    /// A missing, null or nil `_id` is replaced by a fresh v4 uuid.
    ///
    /// # Errors
    /// - `DocError::InvalidDocument` when `document` does not serialize to a
    ///   JSON object or carries a non-uuid `_id`.
    /// - `DocError::DuplicateKey` when the `_id` is already stored.
    pub fn insert(&self, document: &T) -> DocResult<DocumentId> {
        let mut value = serde_json::to_value(document)?;
        let id = assign_id(&mut value)?;
        self.collection.insert_one(value)?;
        debug!(
            "event=document_insert module=document collection={} status=ok id={id}",
            self.collection.name()
        );
        Ok(id)
    }

    /// Loads the document whose `_id` is `id`.
    pub fn find_by_id(&self, id: DocumentId) -> DocResult<T> {
        let mut found = self
            .collection
            .find(&Filter::by_id(id), &FindOptions::default().limit(1))?;
        match found.pop() {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Err(DocError::NotFound(id)),
        }
    }

    /// Returns documents matching `filter`.
    ///
    /// `None` or an empty filter is rejected without touching the
    /// collection; use [`DocumentStore::all`] for a full scan.
    pub fn search(&self, filter: Option<&Filter>, options: &FindOptions) -> DocResult<Array<T>> {
        let filter = self.require_filter(filter, "search")?;
        decode_all(self.collection.find(filter, options)?)
    }

    /// Returns every document in the collection.
    pub fn all(&self, options: &FindOptions) -> DocResult<Array<T>> {
        decode_all(self.collection.find(&Filter::new(), options)?)
    }

    /// Replaces the body of document `id`, keeping its `_id`.
    pub fn update(&self, id: DocumentId, document: &T) -> DocResult<UpdateOutcome> {
        let mut value = serde_json::to_value(document)?;
        let Value::Object(fields) = &mut value else {
            return Err(not_an_object());
        };
        fields.insert(ID_FIELD.to_string(), Value::String(id.to_string()));

        let outcome = self.collection.update_one(&Filter::by_id(id), value)?;
        if outcome.matched == 0 {
            return Err(DocError::NotFound(id));
        }
        Ok(outcome)
    }

    /// Deletes one document matching `filter` and returns the removed count.
    pub fn delete(&self, filter: &Filter) -> DocResult<u64> {
        let filter = self.require_filter(Some(filter), "delete")?;
        let removed = self.collection.delete_one(filter)?;
        debug!(
            "event=document_delete module=document collection={} removed={removed}",
            self.collection.name()
        );
        Ok(removed)
    }

    /// Removes the whole collection.
    pub fn drop_collection(&self) -> DocResult<()> {
        self.collection.drop_collection()
    }

    /// Estimated number of stored documents.
    pub fn count(&self) -> DocResult<u64> {
        self.collection.estimated_count()
    }

    fn require_filter<'f>(
        &self,
        filter: Option<&'f Filter>,
        operation: &str,
    ) -> DocResult<&'f Filter> {
        match filter {
            Some(filter) if !filter.is_empty() => Ok(filter),
            _ => {
                warn!(
                    "event=document_{operation} module=document collection={} status=rejected error_code=empty_filter",
                    self.collection.name()
                );
                Err(DocError::InvalidFilter(format!(
                    "{operation} requires a non-empty filter"
                )))
            }
        }
    }
}

fn decode_all<T: DeserializeOwned>(documents: Vec<Value>) -> DocResult<Array<T>> {
    documents
        .into_iter()
        .map(|value| serde_json::from_value(value).map_err(DocError::from))
        .collect()
}

fn assign_id(value: &mut Value) -> DocResult<DocumentId> {
    let Value::Object(fields) = value else {
        return Err(not_an_object());
    };

    let existing = match fields.get(ID_FIELD) {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(Uuid::parse_str(text).map_err(|err| {
            DocError::InvalidDocument(format!("`{ID_FIELD}` is not a uuid: {err}"))
        })?),
        Some(_) => {
            return Err(DocError::InvalidDocument(format!(
                "`{ID_FIELD}` must be a uuid string"
            )))
        }
    };

    let id = match existing {
        Some(id) if !id.is_nil() => id,
        _ => Uuid::new_v4(),
    };
    fields.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
    Ok(id)
}

fn not_an_object() -> DocError {
    DocError::InvalidDocument("document must serialize to a JSON object".to_string())
}
