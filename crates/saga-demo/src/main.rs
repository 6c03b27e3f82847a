//! Saga demo entry point.

mod config;

use std::process::ExitCode;

use entity_store::InMemoryEntityStore;
use saga::{CustomerEntity, HealthGated, InMemoryDependency, ModellingRecord, Outcome, Saga};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{Config, LogFormat};

fn main() -> ExitCode {
    let config = Config::from_env();

    // 1. Initialize tracing
    let (json_layer, text_layer) = match config.log_format {
        LogFormat::Json => (Some(tracing_subscriber::fmt::layer().json()), None),
        LogFormat::Text => (None, Some(tracing_subscriber::fmt::layer())),
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(json_layer)
        .with(text_layer)
        .init();

    // 2. Install Prometheus metrics recorder
    let metrics_handle = match metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
    {
        Ok(handle) => Some(handle),
        Err(error) => {
            tracing::warn!(%error, "metrics recorder not installed");
            None
        }
    };

    // 3. Wire store, dependencies and saga
    let saga = Saga::new(
        InMemoryEntityStore::<ModellingRecord>::new(),
        HealthGated::new(InMemoryDependency::new("dep1"), config.dep1_health),
        HealthGated::new(InMemoryDependency::new("dep2"), config.dep2_health),
        config.saga.clone(),
    );
    let entity = CustomerEntity::new(config.entity.as_str());
    tracing::info!(
        entity = %config.entity,
        dep1 = %config.dep1_health,
        dep2 = %config.dep2_health,
        rollback_mode = %config.saga.rollback_mode,
        runs = config.runs,
        "starting saga demo"
    );

    // 4. Run
    let mut last = None;
    for attempt in 1..=config.runs.max(1) {
        let outcome = saga.run(&entity);
        match &outcome {
            Outcome::Success(state) => tracing::info!(attempt, %state, "run succeeded"),
            Outcome::Failure(error) => tracing::error!(attempt, %error, "run failed"),
        }
        last = Some(outcome);
    }

    if let Some(handle) = metrics_handle {
        println!("{}", handle.render());
    }

    match last {
        Some(Outcome::Success(_)) => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}
