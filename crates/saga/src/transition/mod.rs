//! Forward and compensating transition tables.
//!
//! Both tables are pure: they map the current state to the side effect to
//! perform and the state to persist afterwards. The orchestrator performs
//! the side effect, then persists.

pub mod backward;
pub mod forward;

use crate::state::SagaState;

/// Which of the two dependencies a side effect targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencySlot {
    First,
    Second,
}

/// Dependency call performed before advancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SideEffect {
    /// Create the entity in the dependency.
    Create(DependencySlot),
    /// Remove the entity from the dependency if it is there.
    RemoveIfExists(DependencySlot),
}

/// One row of a transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub effect: Option<SideEffect>,
    pub next: SagaState,
}

impl Transition {
    const fn to(next: SagaState) -> Self {
        Self { effect: None, next }
    }

    const fn after(effect: SideEffect, next: SagaState) -> Self {
        Self {
            effect: Some(effect),
            next,
        }
    }

    /// Returns true if the transition neither moves nor calls a dependency.
    pub fn is_self_loop(&self, from: SagaState) -> bool {
        self.effect.is_none() && self.next == from
    }
}
