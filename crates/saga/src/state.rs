//! Saga state machine positions.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Position of an entity in the saga, in forward order.
///
/// ```text
/// INITIAL ─► START_DEP1 ─► FINISH_DEP1 ─► INTERNAL_MODELLING1 ─► START_DEP2 ─► FINISH_DEP2 ─► CREATED_OR_UPDATED
/// ```
///
/// `INITIAL` means the entity does not exist anywhere. `CREATED_OR_UPDATED`
/// is the only terminal success state. Both ends loop onto themselves so the
/// transition tables are total.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SagaState {
    /// Identical to deleted.
    #[default]
    Initial,
    StartDep1,
    FinishDep1,
    InternalModelling1,
    StartDep2,
    FinishDep2,
    CreatedOrUpdated,
}

impl SagaState {
    /// All states in forward order.
    pub const ALL: [SagaState; 7] = [
        SagaState::Initial,
        SagaState::StartDep1,
        SagaState::FinishDep1,
        SagaState::InternalModelling1,
        SagaState::StartDep2,
        SagaState::FinishDep2,
        SagaState::CreatedOrUpdated,
    ];

    /// Number of states.
    pub const COUNT: usize = Self::ALL.len();

    /// Returns true for the only terminal success state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SagaState::CreatedOrUpdated)
    }

    /// Returns true if the entity is absent everywhere.
    pub fn is_initial(&self) -> bool {
        matches!(self, SagaState::Initial)
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            SagaState::Initial => "INITIAL",
            SagaState::StartDep1 => "START_DEP1",
            SagaState::FinishDep1 => "FINISH_DEP1",
            SagaState::InternalModelling1 => "INTERNAL_MODELLING1",
            SagaState::StartDep2 => "START_DEP2",
            SagaState::FinishDep2 => "FINISH_DEP2",
            SagaState::CreatedOrUpdated => "CREATED_OR_UPDATED",
        }
    }
}

impl std::fmt::Display for SagaState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown state name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown saga state: {0}")]
pub struct UnknownState(pub String);

impl FromStr for SagaState {
    type Err = UnknownState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SagaState::ALL
            .into_iter()
            .find(|state| state.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownState(s.to_string()))
    }
}
