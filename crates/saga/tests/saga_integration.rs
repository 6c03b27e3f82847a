//! Integration tests for the saga orchestrator.

use entity_store::{EntityStore, InMemoryEntityStore};
use saga::{
    CustomerEntity, Dependency, Direction, EntityId, FailureInjector, FailureStrategy, Health,
    HealthGated, Identifiable, InMemoryDependency, ModellingRecord, Outcome, RecordingObserver,
    RollbackMode, Saga, SagaConfig, SagaState,
};

type TestDependency = HealthGated<InMemoryDependency>;
type TestSaga = Saga<InMemoryEntityStore<ModellingRecord>, TestDependency, TestDependency>;

struct TestHarness {
    records: InMemoryEntityStore<ModellingRecord>,
    dep1: TestDependency,
    dep2: TestDependency,
    failures: FailureInjector,
    rollback_mode: RollbackMode,
}

impl TestHarness {
    fn new() -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        Self {
            records: InMemoryEntityStore::new(),
            dep1: HealthGated::new(InMemoryDependency::new("dep1"), Health::Up),
            dep2: HealthGated::new(InMemoryDependency::new("dep2"), Health::Up),
            failures: FailureInjector::disabled(),
            rollback_mode: RollbackMode::None,
        }
    }

    fn with_rollback(mut self) -> Self {
        self.rollback_mode = RollbackMode::RollbackOnFailure;
        self
    }

    fn with_failures(mut self, strategy: FailureStrategy) -> Self {
        self.failures = FailureInjector::new(strategy);
        self
    }

    fn saga(&self) -> TestSaga {
        Saga::new(
            self.records.clone(),
            self.dep1.clone(),
            self.dep2.clone(),
            SagaConfig::default().with_rollback_mode(self.rollback_mode),
        )
        .with_failure_injector(self.failures.clone())
    }

    fn run(&self, entity: &CustomerEntity) -> Outcome<SagaState> {
        self.saga().run(entity)
    }

    fn state_of(&self, entity: &CustomerEntity) -> Option<SagaState> {
        self.records
            .get(entity.id())
            .unwrap()
            .map(|record| record.state())
    }

    fn seed_state(&self, entity: &CustomerEntity, state: SagaState) {
        self.records
            .put(ModellingRecord::with_state(entity.id().clone(), state))
            .unwrap();
    }
}

fn customer() -> CustomerEntity {
    CustomerEntity::new("customer1")
}

#[test]
fn test_should_finish_in_created_or_updated() {
    let h = TestHarness::new();
    let entity = customer();

    let result = h.run(&entity);

    assert_eq!(result.unwrap_value(), SagaState::CreatedOrUpdated);
    assert_eq!(h.state_of(&entity), Some(SagaState::CreatedOrUpdated));
    assert!(h.dep1.exists(entity.id()).unwrap());
    assert!(h.dep2.exists(entity.id()).unwrap());
}

#[test]
fn test_should_fail_when_recreating_entity_in_dep1() {
    let h = TestHarness::new();
    let entity = customer();
    h.dep1.create(entity.id()).unwrap();

    let result = h.run(&entity);

    assert_eq!(
        result.unwrap_cause().to_string(),
        "Entity customer1 already exists in dependency dep1"
    );
    assert_eq!(h.state_of(&entity), Some(SagaState::StartDep1));
}

#[test]
fn test_should_finish_from_any_starting_state() {
    for state in SagaState::ALL {
        let h = TestHarness::new();
        let entity = customer();
        h.seed_state(&entity, state);

        let result = h.run(&entity);

        assert_eq!(
            result.unwrap_value(),
            SagaState::CreatedOrUpdated,
            "starting from {state}"
        );
    }
}

#[test]
fn test_should_fail_when_dep2_is_down() {
    let h = TestHarness::new();
    let entity = customer();
    h.dep2.set_health(Health::Down);

    let result = h.run(&entity);

    assert_eq!(
        result.unwrap_cause().to_string(),
        "Dependency dep2 failure mode=DOWN while creating"
    );
    assert_eq!(h.state_of(&entity), Some(SagaState::StartDep2));
}

#[test]
fn test_rollback_fails_when_dep2_is_down() {
    let h = TestHarness::new().with_rollback();
    let entity = customer();
    h.dep2.set_health(Health::Down);

    let result = h.run(&entity);

    assert_eq!(
        result.unwrap_cause().to_string(),
        "Dependency dep2 failure mode=DOWN while checking existence"
    );
    assert_eq!(h.state_of(&entity), Some(SagaState::StartDep2));
}

#[test]
fn test_should_recover_from_previous_failure_in_dep2() {
    let mut h = TestHarness::new();
    let entity = customer();
    h.dep2.set_health(Health::Down);
    let setup = h.run(&entity);
    assert_eq!(
        setup.unwrap_cause().to_string(),
        "Dependency dep2 failure mode=DOWN while creating"
    );

    h.rollback_mode = RollbackMode::RollbackOnFailure;
    h.dep2.set_health(Health::Up);
    let result = h.run(&entity);

    assert_eq!(result.unwrap_value(), SagaState::CreatedOrUpdated);
    assert!(h.dep1.exists(entity.id()).unwrap());
    assert!(h.dep2.exists(entity.id()).unwrap());
}

#[test]
fn test_should_compensate_when_create_in_dep2_fails() {
    let observer = RecordingObserver::new();
    let h = TestHarness::new().with_rollback();
    let entity = customer();
    h.dep2.set_health(Health::CreateFails);

    let result = h.saga().with_observer(observer.clone()).run(&entity);

    assert_eq!(result.unwrap_value(), SagaState::Initial);
    assert_eq!(h.state_of(&entity), Some(SagaState::Initial));
    assert!(h.dep1.inner().is_empty());
    assert!(h.dep2.inner().is_empty());

    let backward: Vec<_> = observer
        .events()
        .into_iter()
        .filter(|e| e.direction == Direction::Backward && !e.is_self_loop())
        .map(|e| (e.from, e.to))
        .collect();
    assert_eq!(
        backward,
        vec![
            (SagaState::StartDep2, SagaState::InternalModelling1),
            (SagaState::InternalModelling1, SagaState::FinishDep1),
            (SagaState::FinishDep1, SagaState::StartDep1),
            (SagaState::StartDep1, SagaState::Initial),
        ]
    );
}

#[test]
fn test_should_fail_when_removing_from_dep2_fails() {
    let h = TestHarness::new().with_rollback();
    let entity = customer();
    h.dep2.create(entity.id()).unwrap();
    h.dep2.set_health(Health::RemoveFails);

    let result = h.run(&entity);

    assert_eq!(
        result.unwrap_cause().to_string(),
        "Dependency dep2 failure mode=REMOVE_FAILS while removing"
    );
    assert_eq!(h.state_of(&entity), Some(SagaState::StartDep2));
    assert!(h.dep2.inner().exists(entity.id()).unwrap());
}

#[test]
fn test_roll_back_at_initial_never_calls_dependencies() {
    let h = TestHarness::new();
    let entity = customer();
    h.dep1.set_health(Health::Down);
    h.dep2.set_health(Health::Down);

    let result = h.saga().roll_back(&entity);

    assert_eq!(result.unwrap_value(), SagaState::Initial);
    assert_eq!(h.state_of(&entity), Some(SagaState::Initial));
}

#[test]
fn test_roll_back_unwinds_created_entity() {
    let h = TestHarness::new();
    let entity = customer();
    h.run(&entity).unwrap_value();

    let result = h.saga().roll_back(&entity);

    assert_eq!(result.unwrap_value(), SagaState::Initial);
    assert!(h.dep1.inner().is_empty());
    assert!(h.dep2.inner().is_empty());
}

#[test]
fn test_rerun_of_created_entity_rebuilds_it_with_rollback() {
    let h = TestHarness::new().with_rollback();
    let entity = customer();
    h.run(&entity).unwrap_value();

    let result = h.run(&entity);

    assert_eq!(result.unwrap_value(), SagaState::CreatedOrUpdated);
    assert_eq!(h.dep1.inner().len(), 1);
    assert_eq!(h.dep2.inner().len(), 1);
}

#[test]
fn test_crash_after_create_blocks_run_without_rollback() {
    let h = TestHarness::new().with_failures(FailureStrategy::on_invocation(1));
    let entity = customer();

    let crashed = h.run(&entity).unwrap_cause();
    assert!(crashed.is_injected());
    assert_eq!(h.state_of(&entity), Some(SagaState::StartDep1));
    assert!(h.dep1.exists(entity.id()).unwrap());

    let retried = h.run(&entity);
    assert_eq!(
        retried.unwrap_cause().to_string(),
        "Entity customer1 already exists in dependency dep1"
    );
}

#[test]
fn test_initial_rollback_heals_crash_window() {
    let mut h = TestHarness::new().with_failures(FailureStrategy::on_invocation(1));
    let entity = customer();
    h.run(&entity).unwrap_cause();

    h.rollback_mode = RollbackMode::RollbackOnFailure;
    let result = h.run(&entity);

    assert_eq!(result.unwrap_value(), SagaState::CreatedOrUpdated);
    assert_eq!(h.dep1.inner().len(), 1);
}

#[test]
fn test_initial_rollback_failure_does_not_block_forward_pass() {
    let h = TestHarness::new()
        .with_rollback()
        .with_failures(FailureStrategy::on_invocation(0));
    let entity = customer();
    h.seed_state(&entity, SagaState::StartDep1);

    let result = h.run(&entity);

    assert_eq!(result.unwrap_value(), SagaState::CreatedOrUpdated);
}

#[test]
fn test_should_eventually_succeed_for_single_failure() {
    // Covers the self-loop steps at the end of a forward pass too.
    for invocation in 0..(2 * SagaState::COUNT) as u64 {
        let h = TestHarness::new()
            .with_rollback()
            .with_failures(FailureStrategy::on_invocation(invocation));
        let entity = customer();

        for _ in 0..10 {
            let _ = h.run(&entity);
        }
        let result = h.run(&entity);

        assert_eq!(
            result.unwrap_value(),
            SagaState::CreatedOrUpdated,
            "failure on invocation {invocation}"
        );
    }
}

#[test]
fn test_should_eventually_succeed_for_repeated_failures() {
    for max_invocation in 0..10 {
        let h = TestHarness::new().with_failures(FailureStrategy::on_invocations(0..=max_invocation));
        let entity = customer();

        for _ in 0..10 {
            let _ = h.run(&entity);
        }
        let result = h.run(&entity);

        assert_eq!(
            result.unwrap_value(),
            SagaState::CreatedOrUpdated,
            "failures on invocations 0..={max_invocation}"
        );
    }
}

#[test]
fn test_entities_are_tracked_independently() {
    let h = TestHarness::new();
    let first = customer();
    let second = CustomerEntity::new("customer2");

    h.run(&first).unwrap_value();
    h.dep2.set_health(Health::Down);
    let result = h.run(&second);

    assert!(result.is_failure());
    assert_eq!(h.state_of(&first), Some(SagaState::CreatedOrUpdated));
    assert_eq!(h.state_of(&second), Some(SagaState::StartDep2));
    assert_eq!(
        h.saga().state_of(&EntityId::new("customer2")).unwrap(),
        Some(SagaState::StartDep2)
    );
}
