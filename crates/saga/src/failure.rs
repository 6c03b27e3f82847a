//! Failure injection for crash-window testing.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Which transition invocations should fail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FailureStrategy {
    #[default]
    None,
    /// Fail the listed invocations, counted from zero.
    OnInvocations(BTreeSet<u64>),
}

impl FailureStrategy {
    pub fn on_invocation(invocation: u64) -> Self {
        Self::on_invocations([invocation])
    }

    pub fn on_invocations(invocations: impl IntoIterator<Item = u64>) -> Self {
        FailureStrategy::OnInvocations(invocations.into_iter().collect())
    }

    pub fn fires_on(&self, invocation: u64) -> bool {
        match self {
            FailureStrategy::None => false,
            FailureStrategy::OnInvocations(invocations) => invocations.contains(&invocation),
        }
    }
}

/// Numbers transition invocations and decides which of them fail.
///
/// Every transition, forward or compensating, takes the next invocation
/// number. Clones share the counter, so numbering continues across runs.
#[derive(Debug, Clone, Default)]
pub struct FailureInjector {
    strategy: FailureStrategy,
    invocations: Arc<AtomicU64>,
}

impl FailureInjector {
    pub fn new(strategy: FailureStrategy) -> Self {
        Self {
            strategy,
            invocations: Arc::default(),
        }
    }

    /// An injector that never fires.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn strategy(&self) -> &FailureStrategy {
        &self.strategy
    }

    /// Takes the next invocation number.
    pub fn next_invocation(&self) -> u64 {
        self.invocations.fetch_add(1, Ordering::SeqCst)
    }

    /// Returns true if `invocation` should fail.
    pub fn fires_on(&self, invocation: u64) -> bool {
        self.strategy.fires_on(invocation)
    }

    /// Number of invocations taken so far.
    pub fn invocations(&self) -> u64 {
        self.invocations.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_never_fires() {
        let injector = FailureInjector::disabled();
        for _ in 0..20 {
            let invocation = injector.next_invocation();
            assert!(!injector.fires_on(invocation));
        }
        assert_eq!(injector.invocations(), 20);
    }

    #[test]
    fn test_fires_on_listed_invocations() {
        let injector = FailureInjector::new(FailureStrategy::on_invocations([1, 3]));
        let fired: Vec<_> = (0..5)
            .map(|_| injector.next_invocation())
            .filter(|n| injector.fires_on(*n))
            .collect();
        assert_eq!(fired, vec![1, 3]);
    }

    #[test]
    fn test_clones_share_counter() {
        let injector = FailureInjector::new(FailureStrategy::on_invocation(1));
        let handle = injector.clone();
        assert_eq!(injector.next_invocation(), 0);
        assert_eq!(handle.next_invocation(), 1);
        assert!(handle.fires_on(1));
    }
}
