//! In-memory dependency with nominal behaviour.

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};

use common::EntityId;

use super::{Dependency, DependencyError};

/// In-memory dependency for testing.
///
/// Enforces only the preconditions: creating an existing entity fails with
/// `AlreadyExists`, removing a missing one fails with `NotFound`. Wrap it in
/// [`HealthGated`](super::HealthGated) to simulate outages.
#[derive(Debug, Clone)]
pub struct InMemoryDependency {
    name: Arc<str>,
    entities: Arc<RwLock<HashSet<EntityId>>>,
}

impl InMemoryDependency {
    /// Creates an empty dependency with the given name.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            entities: Arc::default(),
        }
    }

    /// Returns the number of stored entities.
    pub fn len(&self) -> usize {
        self.entities
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if no entity is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every stored entity.
    pub fn clear(&self) {
        self.entities
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Dependency for InMemoryDependency {
    fn name(&self) -> &str {
        &self.name
    }

    fn create(&self, id: &EntityId) -> Result<(), DependencyError> {
        let mut entities = self
            .entities
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if !entities.insert(id.clone()) {
            return Err(DependencyError::AlreadyExists {
                dependency: self.name.to_string(),
                entity: id.clone(),
            });
        }

        tracing::debug!(dependency = %self.name, entity = %id, "created entity");
        Ok(())
    }

    fn exists(&self, id: &EntityId) -> Result<bool, DependencyError> {
        Ok(self
            .entities
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(id))
    }

    fn remove(&self, id: &EntityId) -> Result<(), DependencyError> {
        let mut entities = self
            .entities
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if !entities.remove(id) {
            return Err(DependencyError::NotFound {
                dependency: self.name.to_string(),
                entity: id.clone(),
            });
        }

        tracing::debug!(dependency = %self.name, entity = %id, "removed entity");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_remove() {
        let dependency = InMemoryDependency::new("dep1");
        let id = EntityId::new("customer1");

        dependency.create(&id).unwrap();
        assert!(dependency.exists(&id).unwrap());
        assert_eq!(dependency.len(), 1);

        dependency.remove(&id).unwrap();
        assert!(!dependency.exists(&id).unwrap());
        assert!(dependency.is_empty());
    }

    #[test]
    fn test_create_twice_fails() {
        let dependency = InMemoryDependency::new("dep1");
        let id = EntityId::new("customer1");
        dependency.create(&id).unwrap();

        let err = dependency.create(&id).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Entity customer1 already exists in dependency dep1"
        );
        assert!(!err.is_health_fault());
    }

    #[test]
    fn test_remove_missing_fails_with_not_found() {
        let dependency = InMemoryDependency::new("dep2");
        let err = dependency.remove(&EntityId::new("customer1")).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "Entity customer1 does not exist in dependency dep2"
        );
    }

    #[test]
    fn test_clones_share_entities() {
        let dependency = InMemoryDependency::new("dep1");
        let handle = dependency.clone();
        dependency.create(&EntityId::new("customer1")).unwrap();
        assert_eq!(handle.len(), 1);

        handle.clear();
        assert!(dependency.is_empty());
    }
}
