//! Persisted per-entity saga position.

use chrono::{DateTime, Utc};
use common::{EntityId, Identifiable};
use serde::{Deserialize, Serialize};

use crate::state::SagaState;

/// The durable saga position of one business entity.
///
/// The identity is borrowed from the business entity. The record is never
/// removed by the saga; a fully unwound entity is a record at `INITIAL`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModellingRecord {
    id: EntityId,
    state: SagaState,
    updated_at: DateTime<Utc>,
}

impl ModellingRecord {
    /// Creates a record at `INITIAL`.
    pub fn new(id: EntityId) -> Self {
        Self::with_state(id, SagaState::Initial)
    }

    /// Creates a record at an arbitrary state.
    pub fn with_state(id: EntityId, state: SagaState) -> Self {
        Self {
            id,
            state,
            updated_at: Utc::now(),
        }
    }

    pub fn state(&self) -> SagaState {
        self.state
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Moves the record to `state`. Returns true if the state changed.
    pub fn update_state(&mut self, state: SagaState) -> bool {
        let changed = self.state != state;
        if changed {
            self.state = state;
            self.updated_at = Utc::now();
        }
        changed
    }
}

impl Identifiable for ModellingRecord {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_starts_initial() {
        let record = ModellingRecord::new(EntityId::new("customer1"));
        assert_eq!(record.state(), SagaState::Initial);
        assert_eq!(record.id().as_str(), "customer1");
    }

    #[test]
    fn test_update_state_reports_change() {
        let mut record = ModellingRecord::new(EntityId::new("customer1"));
        let before = record.updated_at();

        assert!(record.update_state(SagaState::StartDep1));
        assert!(!record.update_state(SagaState::StartDep1));
        assert_eq!(record.state(), SagaState::StartDep1);
        assert!(record.updated_at() >= before);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let record = ModellingRecord::with_state(EntityId::new("customer1"), SagaState::FinishDep2);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "customer1");
        assert_eq!(json["state"], "FINISH_DEP2");

        let deserialized: ModellingRecord = serde_json::from_value(json).unwrap();
        assert_eq!(deserialized, record);
    }
}
