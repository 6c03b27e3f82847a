//! Saga orchestrator for creating an entity across two dependencies.
//!
//! The saga drives a modelling record through a forward state machine:
//!
//! ```text
//! INITIAL ─► START_DEP1 ─► FINISH_DEP1 ─► INTERNAL_MODELLING1 ─► START_DEP2 ─► FINISH_DEP2 ─► CREATED_OR_UPDATED
//! ```
//!
//! and can unwind it through a compensating state machine back to `INITIAL`.
//! The record is persisted after every step, so a run interrupted between a
//! dependency call and the persist is reconciled by the next run.

pub mod config;
pub mod dependency;
pub mod error;
pub mod executor;
pub mod failure;
pub mod observer;
pub mod orchestrator;
pub mod outcome;
pub mod record;
pub mod state;
pub mod transition;

pub use common::{CustomerEntity, EntityId, Identifiable};
pub use config::{RollbackMode, SagaConfig};
pub use dependency::{
    Dependency, DependencyError, Health, HealthGated, HealthSwitch, InMemoryDependency, Operation,
};
pub use error::{Result, SagaError};
pub use executor::StepExecutor;
pub use failure::{FailureInjector, FailureStrategy};
pub use observer::{
    Direction, NoOpObserver, RecordingObserver, TracingObserver, TransitionEvent,
    TransitionObserver,
};
pub use orchestrator::Saga;
pub use outcome::Outcome;
pub use record::ModellingRecord;
pub use state::SagaState;
