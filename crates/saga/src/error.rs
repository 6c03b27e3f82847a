//! Saga error types.

use entity_store::StoreError;
use thiserror::Error;

use crate::dependency::DependencyError;
use crate::state::SagaState;

/// Errors that can stop a saga pass.
#[derive(Debug, Error)]
pub enum SagaError {
    /// A dependency call failed.
    #[error(transparent)]
    Dependency(#[from] DependencyError),

    /// The modelling record could not be read or written.
    #[error("Entity store error: {0}")]
    Store(#[from] StoreError),

    /// A simulated crash between a transition and its persist.
    #[error("Injected failure on invocation {invocation} while moving from {from} to {to}")]
    InjectedFailure {
        invocation: u64,
        from: SagaState,
        to: SagaState,
    },
}

impl SagaError {
    /// Returns the dependency error, if this is one.
    pub fn as_dependency(&self) -> Option<&DependencyError> {
        match self {
            SagaError::Dependency(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_injected(&self) -> bool {
        matches!(self, SagaError::InjectedFailure { .. })
    }
}

/// Convenience type alias for saga results.
pub type Result<T> = std::result::Result<T, SagaError>;
