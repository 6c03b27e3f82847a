//! Compensating (rollback) table.
//!
//! Removals fire when leaving a `START_*` state and check existence first,
//! because the matching forward create may never have executed.

use common::EntityId;

use super::{DependencySlot, SideEffect, Transition};
use crate::dependency::{Dependency, DependencyError};
use crate::state::SagaState;

/// Returns the compensating transition out of `state`.
pub fn transition(state: SagaState) -> Transition {
    match state {
        SagaState::CreatedOrUpdated => Transition::to(SagaState::FinishDep2),
        SagaState::FinishDep2 => Transition::to(SagaState::StartDep2),
        SagaState::StartDep2 => Transition::after(
            SideEffect::RemoveIfExists(DependencySlot::Second),
            SagaState::InternalModelling1,
        ),
        SagaState::InternalModelling1 => Transition::to(SagaState::FinishDep1),
        SagaState::FinishDep1 => Transition::to(SagaState::StartDep1),
        SagaState::StartDep1 => Transition::after(
            SideEffect::RemoveIfExists(DependencySlot::First),
            SagaState::Initial,
        ),
        SagaState::Initial => Transition::to(SagaState::Initial),
    }
}

/// Removes the entity from `dependency` if it is present.
///
/// A missing entity counts as already compensated. Health faults are fatal.
pub fn remove_if_exists<D>(dependency: &D, id: &EntityId) -> Result<(), DependencyError>
where
    D: Dependency + ?Sized,
{
    let removal = match dependency.exists(id) {
        Ok(true) => dependency.remove(id),
        Ok(false) => {
            tracing::debug!(dependency = %dependency.name(), entity = %id, "nothing to compensate");
            Ok(())
        }
        Err(e) => Err(e),
    };

    match removal {
        Err(e) if e.is_not_found() => {
            tracing::debug!(dependency = %dependency.name(), entity = %id, "entity already gone");
            Ok(())
        }
        other => other,
    }
}
