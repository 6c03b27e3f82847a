use crate::{EntityId, Identifiable, Result};

/// Keyed persistence of entities by their identity.
///
/// Implementations only need single-key read-your-writes: a `put` followed
/// by a `get` for the same key must observe the written value. No
/// transactional guarantees across keys are assumed.
pub trait EntityStore<T: Identifiable>: Send + Sync {
    /// Returns the entity stored under `id`, if any.
    fn get(&self, id: &EntityId) -> Result<Option<T>>;

    /// Inserts the entity, replacing any previous value with the same identity.
    fn put(&self, entity: T) -> Result<()>;

    /// Removes the entity stored under `id`. Removing an absent key is not an error.
    fn remove(&self, id: &EntityId) -> Result<()>;

    /// Checks whether an entity is stored under `id`.
    fn contains(&self, id: &EntityId) -> Result<bool> {
        Ok(self.get(id)?.is_some())
    }
}

impl<T: Identifiable, S: EntityStore<T> + ?Sized> EntityStore<T> for std::sync::Arc<S> {
    fn get(&self, id: &EntityId) -> Result<Option<T>> {
        (**self).get(id)
    }

    fn put(&self, entity: T) -> Result<()> {
        (**self).put(entity)
    }

    fn remove(&self, id: &EntityId) -> Result<()> {
        (**self).remove(id)
    }
}
