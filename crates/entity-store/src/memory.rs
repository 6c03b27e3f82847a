use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::{EntityId, EntityStore, Identifiable, Result, StoreError};

/// In-memory entity store.
///
/// Clones share the same underlying map, so a test can keep a handle to the
/// store it hands to the orchestrator.
#[derive(Debug)]
pub struct InMemoryEntityStore<T> {
    entities: Arc<RwLock<HashMap<EntityId, T>>>,
}

impl<T> Clone for InMemoryEntityStore<T> {
    fn clone(&self) -> Self {
        Self {
            entities: Arc::clone(&self.entities),
        }
    }
}

impl<T> Default for InMemoryEntityStore<T> {
    fn default() -> Self {
        Self {
            entities: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<T> InMemoryEntityStore<T> {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entities.
    pub fn len(&self) -> Result<usize> {
        let entities = self
            .entities
            .read()
            .map_err(|_| StoreError::Poisoned { operation: "len" })?;
        Ok(entities.len())
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Removes every stored entity.
    pub fn clear(&self) -> Result<()> {
        self.entities
            .write()
            .map_err(|_| StoreError::Poisoned { operation: "clear" })?
            .clear();
        Ok(())
    }
}

impl<T> EntityStore<T> for InMemoryEntityStore<T>
where
    T: Identifiable + Clone + Send + Sync,
{
    fn get(&self, id: &EntityId) -> Result<Option<T>> {
        let entities = self
            .entities
            .read()
            .map_err(|_| StoreError::Poisoned { operation: "get" })?;
        Ok(entities.get(id).cloned())
    }

    fn put(&self, entity: T) -> Result<()> {
        let mut entities = self
            .entities
            .write()
            .map_err(|_| StoreError::Poisoned { operation: "put" })?;
        tracing::trace!(id = %entity.id(), "storing entity");
        entities.insert(entity.id().clone(), entity);
        Ok(())
    }

    fn remove(&self, id: &EntityId) -> Result<()> {
        let mut entities = self
            .entities
            .write()
            .map_err(|_| StoreError::Poisoned { operation: "remove" })?;
        entities.remove(id);
        Ok(())
    }
}
