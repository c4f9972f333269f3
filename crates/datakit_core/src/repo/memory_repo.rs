//! In-memory repository backed by an ordered map.
//!
//! # Invariants
//! - Identifier allocation and map mutation happen under one write lock.
//! - Reads take the shared lock, so they never observe a half-applied write.

use super::repository::{EntityId, RepoError, RepoResult, Repository};
use crate::collection::Array;
use log::debug;
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

struct MemoryState<T> {
    next_id: EntityId,
    data: BTreeMap<EntityId, T>,
}

/// Thread-safe in-process repository.
pub struct MemoryRepository<T> {
    state: RwLock<MemoryState<T>>,
}

impl<T> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryState {
                next_id: 1,
                data: BTreeMap::new(),
            }),
        }
    }

    /// Number of stored entities.
    pub fn len(&self) -> usize {
        self.read().data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> RwLockReadGuard<'_, MemoryState<T>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemoryState<T>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> Repository<T> for MemoryRepository<T> {
    fn create(&self, entity: T) -> RepoResult<EntityId> {
        let mut state = self.write();
        let id = state.next_id;
        state.next_id += 1;
        state.data.insert(id, entity);
        debug!("event=entity_create module=repo backend=memory status=ok id={id}");
        Ok(id)
    }

    fn update(&self, id: EntityId, entity: T) -> RepoResult<()> {
        let mut state = self.write();
        match state.data.get_mut(&id) {
            Some(slot) => {
                *slot = entity;
                Ok(())
            }
            None => Err(RepoError::NotFound(id)),
        }
    }

    fn get(&self, id: EntityId) -> RepoResult<T> {
        self.read()
            .data
            .get(&id)
            .cloned()
            .ok_or(RepoError::NotFound(id))
    }

    fn get_all(&self) -> RepoResult<Array<T>> {
        Ok(self.read().data.values().cloned().collect())
    }

    fn delete(&self, id: EntityId) -> RepoResult<()> {
        let mut state = self.write();
        if state.data.remove(&id).is_none() {
            return Err(RepoError::NotFound(id));
        }
        debug!("event=entity_delete module=repo backend=memory status=ok id={id}");
        Ok(())
    }
}
