//! Forward (creation) table.
//!
//! A `START_*` state is persisted before its dependency call runs, so a crash
//! between the persist and the call leaves a marker that the create may or
//! may not have happened.

use super::{DependencySlot, SideEffect, Transition};
use crate::state::SagaState;

/// Returns the forward transition out of `state`.
pub fn transition(state: SagaState) -> Transition {
    match state {
        SagaState::Initial => Transition::to(SagaState::StartDep1),
        SagaState::StartDep1 => Transition::after(
            SideEffect::Create(DependencySlot::First),
            SagaState::FinishDep1,
        ),
        // Placeholder for internal modelling between the two dependencies.
        SagaState::FinishDep1 => Transition::to(SagaState::InternalModelling1),
        SagaState::InternalModelling1 => Transition::to(SagaState::StartDep2),
        SagaState::StartDep2 => Transition::after(
            SideEffect::Create(DependencySlot::Second),
            SagaState::FinishDep2,
        ),
        SagaState::FinishDep2 => Transition::to(SagaState::CreatedOrUpdated),
        SagaState::CreatedOrUpdated => Transition::to(SagaState::CreatedOrUpdated),
    }
}
