//! Transition observer hook.

use std::sync::{Arc, Mutex, PoisonError};

use common::EntityId;

use crate::outcome::Outcome;
use crate::state::SagaState;

/// Direction of a saga pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Direction::Forward => "forward",
            Direction::Backward => "backward",
        })
    }
}

/// A persisted transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionEvent {
    pub entity: EntityId,
    pub direction: Direction,
    pub from: SagaState,
    pub to: SagaState,
    pub invocation: u64,
}

impl TransitionEvent {
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

/// Sink called by the orchestrator at each persisted transition.
pub trait TransitionObserver: Send + Sync {
    fn on_pass_started(&self, _entity: &EntityId, _direction: Direction, _state: SagaState) {}

    fn on_transition(&self, event: &TransitionEvent);

    fn on_pass_finished(
        &self,
        _entity: &EntityId,
        _direction: Direction,
        _outcome: &Outcome<SagaState>,
    ) {
    }
}

impl<O: TransitionObserver + ?Sized> TransitionObserver for Arc<O> {
    fn on_pass_started(&self, entity: &EntityId, direction: Direction, state: SagaState) {
        (**self).on_pass_started(entity, direction, state);
    }

    fn on_transition(&self, event: &TransitionEvent) {
        (**self).on_transition(event);
    }

    fn on_pass_finished(
        &self,
        entity: &EntityId,
        direction: Direction,
        outcome: &Outcome<SagaState>,
    ) {
        (**self).on_pass_finished(entity, direction, outcome);
    }
}

/// No-op observer
pub struct NoOpObserver;

impl TransitionObserver for NoOpObserver {
    fn on_transition(&self, _event: &TransitionEvent) {}
}

/// Tracing-based observer
pub struct TracingObserver;

impl TransitionObserver for TracingObserver {
    fn on_pass_started(&self, entity: &EntityId, direction: Direction, state: SagaState) {
        tracing::debug!(%entity, %direction, %state, "Pass started");
    }

    fn on_transition(&self, event: &TransitionEvent) {
        if event.is_self_loop() {
            tracing::trace!(
                entity = %event.entity,
                direction = %event.direction,
                state = %event.to,
                invocation = event.invocation,
                "State unchanged"
            );
        } else {
            tracing::debug!(
                entity = %event.entity,
                direction = %event.direction,
                from = %event.from,
                to = %event.to,
                invocation = event.invocation,
                "State changed"
            );
        }
    }

    fn on_pass_finished(
        &self,
        entity: &EntityId,
        direction: Direction,
        outcome: &Outcome<SagaState>,
    ) {
        match outcome {
            Outcome::Success(state) => {
                tracing::debug!(%entity, %direction, %state, "Pass finished");
            }
            Outcome::Failure(error) => {
                tracing::warn!(%entity, %direction, %error, "Pass failed");
            }
        }
    }
}

/// Observer that keeps every transition in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<TransitionEvent>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded events.
    pub fn events(&self) -> Vec<TransitionEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the recorded events that changed state.
    pub fn state_changes(&self) -> Vec<(SagaState, SagaState)> {
        self.events()
            .into_iter()
            .filter(|event| !event.is_self_loop())
            .map(|event| (event.from, event.to))
            .collect()
    }
}

impl TransitionObserver for RecordingObserver {
    fn on_transition(&self, event: &TransitionEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
