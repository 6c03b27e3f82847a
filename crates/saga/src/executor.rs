//! Bounded step executor.

use crate::outcome::Outcome;

/// Runs a single-step transition function a fixed number of times.
///
/// The executor does not look at the values it produces: it always performs
/// `max_iterations` calls unless one of them fails. Transition tables loop on
/// their end states, so the extra calls after reaching an end are no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepExecutor {
    max_iterations: usize,
}

impl StepExecutor {
    /// Creates an executor; a ceiling of zero is raised to one.
    pub fn new(max_iterations: usize) -> Self {
        Self {
            max_iterations: max_iterations.max(1),
        }
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Calls `step` until it fails or the ceiling is reached.
    ///
    /// Returns the first failure, or the value of the last call.
    pub fn run<T, E>(&self, mut step: impl FnMut() -> Result<T, E>) -> Outcome<T, E> {
        let mut last = match step() {
            Ok(value) => value,
            Err(e) => return Outcome::Failure(e),
        };

        for _ in 1..self.max_iterations {
            match step() {
                Ok(value) => last = value,
                Err(e) => return Outcome::Failure(e),
            }
        }

        Outcome::Success(last)
    }
}
