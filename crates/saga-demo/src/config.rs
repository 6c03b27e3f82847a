//! Demo configuration loaded from environment variables.

use saga::{Health, SagaConfig};

/// Scenario configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `SAGA_ENTITY` — identifier of the entity to create (default: `"customer1"`)
/// - `DEP1_HEALTH`, `DEP2_HEALTH` — `up`, `create-fails`, `remove-fails` or `down` (default: `up`)
/// - `SAGA_RUNS` — how many times to run the saga for the entity (default: `1`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT` — `text` or `json` (default: `text`)
///
/// Saga settings come from [`SagaConfig::from_env`].
#[derive(Debug, Clone)]
pub struct Config {
    pub entity: String,
    pub dep1_health: Health,
    pub dep2_health: Health,
    pub runs: u32,
    pub log_level: String,
    pub log_format: LogFormat,
    pub saga: SagaConfig,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            entity: std::env::var("SAGA_ENTITY").unwrap_or(defaults.entity),
            dep1_health: health_var("DEP1_HEALTH").unwrap_or(defaults.dep1_health),
            dep2_health: health_var("DEP2_HEALTH").unwrap_or(defaults.dep2_health),
            runs: std::env::var("SAGA_RUNS")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(defaults.runs),
            log_level: std::env::var("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: std::env::var("LOG_FORMAT")
                .ok()
                .and_then(|f| LogFormat::parse(&f))
                .unwrap_or(defaults.log_format),
            saga: SagaConfig::from_env(),
        }
    }
}

/// Output format of the log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

fn health_var(key: &str) -> Option<Health> {
    std::env::var(key).ok().and_then(|h| h.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            entity: "customer1".to_string(),
            dep1_health: Health::Up,
            dep2_health: Health::Up,
            runs: 1,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            saga: SagaConfig::default(),
        }
    }
}
