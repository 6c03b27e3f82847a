//! Orchestrator configuration loaded from environment variables.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::state::SagaState;

/// What to do when the forward pass fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RollbackMode {
    /// Propagate the forward failure untouched.
    #[default]
    None,
    /// Run the compensating pass and return its outcome.
    RollbackOnFailure,
}

impl RollbackMode {
    /// Returns true if any rollback (initial or recovery) may run.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, RollbackMode::None)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RollbackMode::None => "none",
            RollbackMode::RollbackOnFailure => "rollback-on-failure",
        }
    }
}

impl std::fmt::Display for RollbackMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown rollback mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown rollback mode: {0}")]
pub struct UnknownRollbackMode(pub String);

impl FromStr for RollbackMode {
    type Err = UnknownRollbackMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "none" => Ok(RollbackMode::None),
            "rollback-on-failure" => Ok(RollbackMode::RollbackOnFailure),
            _ => Err(UnknownRollbackMode(s.to_string())),
        }
    }
}

/// Saga configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `SAGA_ROLLBACK_MODE` — `none` or `rollback-on-failure` (default: `none`)
/// - `SAGA_MAX_ITERATIONS` — step executor ceiling per pass (default: twice the number of states)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SagaConfig {
    pub rollback_mode: RollbackMode,
    pub max_iterations: usize,
}

impl SagaConfig {
    /// Default ceiling: enough for two full traversals of the state cycle.
    pub const DEFAULT_MAX_ITERATIONS: usize = 2 * SagaState::COUNT;

    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            rollback_mode: lookup("SAGA_ROLLBACK_MODE")
                .and_then(|m| m.parse().ok())
                .unwrap_or(defaults.rollback_mode),
            max_iterations: lookup("SAGA_MAX_ITERATIONS")
                .and_then(|n| n.parse().ok())
                .unwrap_or(defaults.max_iterations),
        }
    }

    pub fn with_rollback_mode(mut self, rollback_mode: RollbackMode) -> Self {
        self.rollback_mode = rollback_mode;
        self
    }

    /// Returns the executor ceiling, never below two full traversals.
    pub fn iteration_ceiling(&self) -> usize {
        self.max_iterations.max(Self::DEFAULT_MAX_ITERATIONS)
    }
}

impl Default for SagaConfig {
    fn default() -> Self {
        Self {
            rollback_mode: RollbackMode::None,
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
        }
    }
}
