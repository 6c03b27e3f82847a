//! External dependency trait, error taxonomy and in-memory implementations.

pub mod health;
pub mod memory;

use std::sync::Arc;

use common::EntityId;
use thiserror::Error;

pub use health::{Health, HealthGated, HealthSwitch};
pub use memory::InMemoryDependency;

/// The dependency operation that raised a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    CheckExistence,
    Remove,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Operation::Create => "creating",
            Operation::CheckExistence => "checking existence",
            Operation::Remove => "removing",
        })
    }
}

/// Errors raised by a dependency.
///
/// `Unhealthy` is a health fault: the dependency cannot answer at all and the
/// error is always fatal. `AlreadyExists` and `NotFound` are precondition
/// faults; compensation absorbs `NotFound`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DependencyError {
    #[error("Dependency {dependency} failure mode={mode} while {operation}")]
    Unhealthy {
        dependency: String,
        mode: Health,
        operation: Operation,
    },

    #[error("Entity {entity} already exists in dependency {dependency}")]
    AlreadyExists { dependency: String, entity: EntityId },

    #[error("Entity {entity} does not exist in dependency {dependency}")]
    NotFound { dependency: String, entity: EntityId },
}

impl DependencyError {
    pub fn is_health_fault(&self) -> bool {
        matches!(self, DependencyError::Unhealthy { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DependencyError::NotFound { .. })
    }
}

/// An external system that can hold a record for an entity.
pub trait Dependency: Send + Sync {
    /// Name used in logs and error messages.
    fn name(&self) -> &str;

    /// Creates the entity. Fails if it already exists.
    fn create(&self, id: &EntityId) -> Result<(), DependencyError>;

    /// Checks whether the entity exists.
    fn exists(&self, id: &EntityId) -> Result<bool, DependencyError>;

    /// Removes the entity. Fails if it does not exist.
    fn remove(&self, id: &EntityId) -> Result<(), DependencyError>;
}

impl<D: Dependency + ?Sized> Dependency for Arc<D> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn create(&self, id: &EntityId) -> Result<(), DependencyError> {
        (**self).create(id)
    }

    fn exists(&self, id: &EntityId) -> Result<bool, DependencyError> {
        (**self).exists(id)
    }

    fn remove(&self, id: &EntityId) -> Result<(), DependencyError> {
        (**self).remove(id)
    }
}

impl<D: Dependency + ?Sized> Dependency for &D {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn create(&self, id: &EntityId) -> Result<(), DependencyError> {
        (**self).create(id)
    }

    fn exists(&self, id: &EntityId) -> Result<bool, DependencyError> {
        (**self).exists(id)
    }

    fn remove(&self, id: &EntityId) -> Result<(), DependencyError> {
        (**self).remove(id)
    }
}
