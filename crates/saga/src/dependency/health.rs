//! Health modes and the fault-injecting dependency decorator.

use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use common::EntityId;

use super::{Dependency, DependencyError, Operation};

/// Configured failure behaviour of a dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Health {
    /// Nominal behaviour.
    #[default]
    Up,
    /// `create` fails once its preconditions hold.
    CreateFails,
    /// `remove` fails once its preconditions hold.
    RemoveFails,
    /// Every operation fails.
    Down,
}

impl Health {
    pub fn as_str(&self) -> &'static str {
        match self {
            Health::Up => "UP",
            Health::CreateFails => "CREATE_FAILS",
            Health::RemoveFails => "REMOVE_FAILS",
            Health::Down => "DOWN",
        }
    }

    fn to_u8(self) -> u8 {
        match self {
            Health::Up => 0,
            Health::CreateFails => 1,
            Health::RemoveFails => 2,
            Health::Down => 3,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => Health::CreateFails,
            2 => Health::RemoveFails,
            3 => Health::Down,
            _ => Health::Up,
        }
    }
}

impl std::fmt::Display for Health {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown health mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown health mode: {0}")]
pub struct UnknownHealth(pub String);

impl FromStr for Health {
    type Err = UnknownHealth;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "up" => Ok(Health::Up),
            "create-fails" => Ok(Health::CreateFails),
            "remove-fails" => Ok(Health::RemoveFails),
            "down" => Ok(Health::Down),
            _ => Err(UnknownHealth(s.to_string())),
        }
    }
}

/// Shared, switchable health mode.
///
/// Clones observe the same mode, so a harness can flip the health of a
/// dependency that is already owned by an orchestrator.
#[derive(Debug, Clone, Default)]
pub struct HealthSwitch {
    mode: Arc<AtomicU8>,
}

impl HealthSwitch {
    pub fn new(health: Health) -> Self {
        Self {
            mode: Arc::new(AtomicU8::new(health.to_u8())),
        }
    }

    pub fn get(&self) -> Health {
        Health::from_u8(self.mode.load(Ordering::SeqCst))
    }

    pub fn set(&self, health: Health) {
        self.mode.store(health.to_u8(), Ordering::SeqCst);
    }
}

/// Decorates a dependency with a health mode.
///
/// Check order: `DOWN` fails every operation before anything else is
/// evaluated. `CREATE_FAILS` and `REMOVE_FAILS` only fire after the wrapped
/// operation's precondition holds, so a duplicate create still reports
/// `AlreadyExists` and a missing remove still reports `NotFound`.
#[derive(Debug, Clone)]
pub struct HealthGated<D> {
    inner: D,
    health: HealthSwitch,
}

impl<D: Dependency> HealthGated<D> {
    pub fn new(inner: D, health: Health) -> Self {
        Self::with_switch(inner, HealthSwitch::new(health))
    }

    /// Wraps `inner` using an existing switch.
    pub fn with_switch(inner: D, health: HealthSwitch) -> Self {
        Self { inner, health }
    }

    pub fn health(&self) -> Health {
        self.health.get()
    }

    pub fn set_health(&self, health: Health) {
        tracing::debug!(dependency = %self.inner.name(), %health, "health mode changed");
        self.health.set(health);
    }

    /// Returns a handle to the shared health switch.
    pub fn switch(&self) -> HealthSwitch {
        self.health.clone()
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }

    fn fault(&self, mode: Health, operation: Operation) -> DependencyError {
        DependencyError::Unhealthy {
            dependency: self.inner.name().to_string(),
            mode,
            operation,
        }
    }
}

impl<D: Dependency> Dependency for HealthGated<D> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn create(&self, id: &EntityId) -> Result<(), DependencyError> {
        match self.health() {
            Health::Down => Err(self.fault(Health::Down, Operation::Create)),
            Health::CreateFails => {
                if self.inner.exists(id)? {
                    return Err(DependencyError::AlreadyExists {
                        dependency: self.inner.name().to_string(),
                        entity: id.clone(),
                    });
                }
                Err(self.fault(Health::CreateFails, Operation::Create))
            }
            Health::Up | Health::RemoveFails => self.inner.create(id),
        }
    }

    fn exists(&self, id: &EntityId) -> Result<bool, DependencyError> {
        match self.health() {
            Health::Down => Err(self.fault(Health::Down, Operation::CheckExistence)),
            _ => self.inner.exists(id),
        }
    }

    fn remove(&self, id: &EntityId) -> Result<(), DependencyError> {
        match self.health() {
            Health::Down => Err(self.fault(Health::Down, Operation::Remove)),
            Health::RemoveFails => {
                if !self.inner.exists(id)? {
                    return Err(DependencyError::NotFound {
                        dependency: self.inner.name().to_string(),
                        entity: id.clone(),
                    });
                }
                Err(self.fault(Health::RemoveFails, Operation::Remove))
            }
            Health::Up | Health::CreateFails => self.inner.remove(id),
        }
    }
}
