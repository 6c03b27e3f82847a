//! Saga orchestrator driving an entity across both dependencies.

use std::sync::Arc;
use std::time::Instant;

use common::{EntityId, Identifiable};
use entity_store::EntityStore;

use crate::config::{RollbackMode, SagaConfig};
use crate::dependency::Dependency;
use crate::error::{Result, SagaError};
use crate::executor::StepExecutor;
use crate::failure::FailureInjector;
use crate::observer::{Direction, TracingObserver, TransitionEvent, TransitionObserver};
use crate::outcome::Outcome;
use crate::record::ModellingRecord;
use crate::state::SagaState;
use crate::transition::{DependencySlot, SideEffect, backward, forward};

/// Orchestrates the creation of an entity across two dependencies.
///
/// Each run first reconciles a record left mid-flight by an interrupted run
/// (when rollback is enabled), then runs the forward pass, and on failure
/// optionally runs a compensating pass.
///
/// At most one run per entity may be in flight at a time; the saga does no
/// locking of its own.
pub struct Saga<S, D1, D2> {
    records: S,
    dep1: D1,
    dep2: D2,
    config: SagaConfig,
    executor: StepExecutor,
    failures: FailureInjector,
    observer: Arc<dyn TransitionObserver>,
}

impl<S, D1, D2> Saga<S, D1, D2>
where
    S: EntityStore<ModellingRecord>,
    D1: Dependency,
    D2: Dependency,
{
    /// Creates a new saga.
    pub fn new(records: S, dep1: D1, dep2: D2, config: SagaConfig) -> Self {
        let executor = StepExecutor::new(config.iteration_ceiling());
        Self {
            records,
            dep1,
            dep2,
            config,
            executor,
            failures: FailureInjector::disabled(),
            observer: Arc::new(TracingObserver),
        }
    }

    /// Injects simulated crashes between a transition and its persist.
    pub fn with_failure_injector(mut self, failures: FailureInjector) -> Self {
        self.failures = failures;
        self
    }

    /// Replaces the default tracing observer.
    pub fn with_observer(mut self, observer: impl TransitionObserver + 'static) -> Self {
        self.observer = Arc::new(observer);
        self
    }

    pub fn set_rollback_mode(&mut self, rollback_mode: RollbackMode) {
        self.config.rollback_mode = rollback_mode;
    }

    pub fn config(&self) -> &SagaConfig {
        &self.config
    }

    /// Returns the persisted saga state of an entity, if it has a record.
    pub fn state_of(&self, id: &EntityId) -> Result<Option<SagaState>> {
        Ok(self.records.get(id)?.map(|record| record.state()))
    }

    /// Runs the saga for `entity` and returns the final persisted state.
    #[tracing::instrument(skip_all, fields(entity = %entity.id(), rollback_mode = %self.config.rollback_mode))]
    pub fn run(&self, entity: &impl Identifiable) -> Outcome<SagaState> {
        metrics::counter!("saga_runs_total").increment(1);
        let started = Instant::now();

        let outcome = Outcome::capture(|| self.load_or_create(entity.id())).try_map(|mut record| {
            self.initial_rollback(&mut record);
            self.create(&mut record)
                .try_recovery(|cause| self.recovery_rollback(&mut record, cause))
                .into_result()
        });

        metrics::histogram!("saga_run_duration_seconds")
            .record(started.elapsed().as_secs_f64());
        match &outcome {
            Outcome::Success(state) => {
                metrics::counter!("saga_runs_succeeded").increment(1);
                tracing::info!(%state, "saga run finished");
            }
            Outcome::Failure(error) => {
                metrics::counter!("saga_runs_failed").increment(1);
                tracing::warn!(%error, "saga run failed");
            }
        }

        outcome
    }

    /// Unwinds `entity` back to `INITIAL` with a single compensating pass.
    #[tracing::instrument(skip_all, fields(entity = %entity.id()))]
    pub fn roll_back(&self, entity: &impl Identifiable) -> Outcome<SagaState> {
        Outcome::capture(|| self.load_or_create(entity.id()))
            .try_map(|mut record| self.compensate(&mut record).into_result())
    }

    fn load_or_create(&self, id: &EntityId) -> Result<ModellingRecord> {
        if let Some(record) = self.records.get(id)? {
            return Ok(record);
        }

        let record = ModellingRecord::new(id.clone());
        self.records.put(record.clone())?;
        tracing::debug!(entity = %id, "created modelling record");
        Ok(record)
    }

    /// Best-effort cleanup of a record left mid-flight by an earlier run.
    fn initial_rollback(&self, record: &mut ModellingRecord) {
        if !self.config.rollback_mode.is_enabled() || record.state().is_initial() {
            return;
        }

        tracing::info!(state = %record.state(), "rolling back interrupted run");
        if let Outcome::Failure(error) = self.compensate(record) {
            tracing::warn!(%error, state = %record.state(), "initial rollback failed, continuing");
        }
    }

    fn recovery_rollback(
        &self,
        record: &mut ModellingRecord,
        cause: SagaError,
    ) -> Result<SagaState> {
        match self.config.rollback_mode {
            RollbackMode::RollbackOnFailure => {
                tracing::warn!(
                    error = %cause,
                    state = %record.state(),
                    "forward pass failed, compensating"
                );
                self.compensate(record).into_result()
            }
            RollbackMode::None => Err(cause),
        }
    }

    fn create(&self, record: &mut ModellingRecord) -> Outcome<SagaState> {
        self.pass(record, Direction::Forward)
    }

    fn compensate(&self, record: &mut ModellingRecord) -> Outcome<SagaState> {
        metrics::counter!("saga_compensations_total").increment(1);
        self.pass(record, Direction::Backward)
    }

    fn pass(&self, record: &mut ModellingRecord, direction: Direction) -> Outcome<SagaState> {
        let entity = record.id().clone();
        self.observer.on_pass_started(&entity, direction, record.state());

        let outcome = self.executor.run(|| self.step(record, direction));

        self.observer.on_pass_finished(&entity, direction, &outcome);
        outcome
    }

    /// Performs one transition: side effect, then persist.
    fn step(&self, record: &mut ModellingRecord, direction: Direction) -> Result<SagaState> {
        let invocation = self.failures.next_invocation();
        let from = record.state();
        let transition = match direction {
            Direction::Forward => forward::transition(from),
            Direction::Backward => backward::transition(from),
        };

        if let Some(effect) = transition.effect {
            self.apply(effect, record.id())?;
        }

        if self.failures.fires_on(invocation) {
            return Err(SagaError::InjectedFailure {
                invocation,
                from,
                to: transition.next,
            });
        }

        let mut updated = record.clone();
        updated.update_state(transition.next);
        self.records.put(updated.clone())?;
        *record = updated;

        self.observer.on_transition(&TransitionEvent {
            entity: record.id().clone(),
            direction,
            from,
            to: transition.next,
            invocation,
        });
        Ok(transition.next)
    }

    fn apply(&self, effect: SideEffect, id: &EntityId) -> Result<()> {
        match effect {
            SideEffect::Create(slot) => self.dependency(slot).create(id)?,
            SideEffect::RemoveIfExists(slot) => {
                backward::remove_if_exists(self.dependency(slot), id)?
            }
        }
        Ok(())
    }

    fn dependency(&self, slot: DependencySlot) -> &dyn Dependency {
        match slot {
            DependencySlot::First => &self.dep1,
            DependencySlot::Second => &self.dep2,
        }
    }
}
