//! Success/failure container used to propagate saga results.

use crate::error::SagaError;

/// The result of a saga pass: either a value or the fault that stopped it.
///
/// Unlike [`Result`], the combinators here model recovery explicitly:
/// [`Outcome::try_recovery`] replaces a failure with a freshly computed value,
/// and a failing recovery shadows the original cause.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Outcome<T, E = SagaError> {
    Success(T),
    Failure(E),
}

impl<T, E> Outcome<T, E> {
    /// Runs a fallible computation and captures its result.
    pub fn capture(f: impl FnOnce() -> Result<T, E>) -> Self {
        f().into()
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    /// Borrows the success value, if any.
    pub fn success(&self) -> Option<&T> {
        match self {
            Outcome::Success(value) => Some(value),
            Outcome::Failure(_) => None,
        }
    }

    /// Borrows the failure cause, if any.
    pub fn failure(&self) -> Option<&E> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(cause) => Some(cause),
        }
    }

    /// Transforms the success value; a failure passes through unchanged.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U, E> {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value)),
            Outcome::Failure(cause) => Outcome::Failure(cause),
        }
    }

    /// Transforms the success value with a fallible function.
    ///
    /// If `f` fails, the outcome becomes a failure carrying that error.
    pub fn try_map<U>(self, f: impl FnOnce(T) -> Result<U, E>) -> Outcome<U, E> {
        match self {
            Outcome::Success(value) => f(value).into(),
            Outcome::Failure(cause) => Outcome::Failure(cause),
        }
    }

    /// Transforms the failure cause; a success passes through unchanged.
    pub fn map_failure<F>(self, f: impl FnOnce(E) -> F) -> Outcome<T, F> {
        match self {
            Outcome::Success(value) => Outcome::Success(value),
            Outcome::Failure(cause) => Outcome::Failure(f(cause)),
        }
    }

    /// Attempts to replace a failure with a recovered value.
    ///
    /// If the recovery itself fails, its error replaces the original cause.
    pub fn try_recovery(self, recover: impl FnOnce(E) -> Result<T, E>) -> Self {
        match self {
            Outcome::Success(value) => Outcome::Success(value),
            Outcome::Failure(cause) => recover(cause).into(),
        }
    }

    /// Converts into a standard [`Result`].
    pub fn into_result(self) -> Result<T, E> {
        self.into()
    }
}

impl<T, E: std::fmt::Display> Outcome<T, E> {
    /// Returns the success value.
    ///
    /// # Panics
    ///
    /// Panics if the outcome is a failure.
    #[track_caller]
    pub fn unwrap_value(self) -> T {
        match self {
            Outcome::Success(value) => value,
            Outcome::Failure(cause) => {
                panic!("called `Outcome::unwrap_value()` on a failure: {cause}")
            }
        }
    }
}

impl<T, E> Outcome<T, E> {
    /// Returns the failure cause.
    ///
    /// # Panics
    ///
    /// Panics if the outcome is a success.
    #[track_caller]
    pub fn unwrap_cause(self) -> E {
        match self {
            Outcome::Success(_) => panic!("called `Outcome::unwrap_cause()` on a success"),
            Outcome::Failure(cause) => cause,
        }
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(cause) => Outcome::Failure(cause),
        }
    }
}

impl<T, E> From<Outcome<T, E>> for Result<T, E> {
    fn from(outcome: Outcome<T, E>) -> Self {
        match outcome {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure(cause) => Err(cause),
        }
    }
}
