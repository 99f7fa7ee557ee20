use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

/// Cancellation/deadline scope a request runs under.
///
/// A scope is an immutable value: binding a different scope to a caller means
/// constructing a new one, never mutating one that is already shared. Clones
/// observe the same cancellation signal.
#[derive(Clone, Debug, Default)]
pub struct RequestScope {
    deadline: Option<Instant>,
    cancel: Option<watch::Receiver<bool>>,
}

/// Handle that cancels every request bound to the scope it was created with.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl RequestScope {
    /// Scope with no deadline that can never be cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scope whose requests fail with a deadline error after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + timeout),
            cancel: None,
        }
    }

    /// Scope that aborts in-flight requests when the returned handle fires.
    pub fn cancellable() -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        let scope = Self {
            deadline: None,
            cancel: Some(rx),
        };
        (scope, CancelHandle { tx })
    }

    /// Attaches a deadline to this scope, keeping its cancellation signal.
    pub fn and_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|rx| *rx.borrow())
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Resolves once the scope is cancelled; pends forever on a scope without
    /// a cancellation signal.
    pub(crate) async fn cancelled(&self) {
        match &self.cancel {
            Some(rx) => {
                let mut rx = rx.clone();
                if *rx.borrow() {
                    return;
                }
                // The sender side dropping means cancel can no longer fire.
                while rx.changed().await.is_ok() {
                    if *rx.borrow() {
                        return;
                    }
                }
                std::future::pending::<()>().await;
            }
            None => std::future::pending::<()>().await,
        }
    }

    /// Resolves once the deadline has elapsed; pends forever without one.
    pub(crate) async fn deadline_elapsed(&self) {
        match self.deadline {
            Some(at) => tokio::time::sleep_until(at).await,
            None => std::future::pending::<()>().await,
        }
    }
}

impl CancelHandle {
    /// Signals cancellation to every request bound to the scope.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scope_is_unbounded() {
        let scope = RequestScope::new();
        assert!(!scope.is_cancelled());
        assert!(scope.deadline().is_none());
    }

    #[test]
    fn test_cancel_reaches_all_clones() {
        let (scope, handle) = RequestScope::cancellable();
        let clone = scope.clone();
        assert!(!clone.is_cancelled());

        handle.cancel();
        assert!(scope.is_cancelled());
        assert!(clone.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_future_resolves_after_signal() {
        let (scope, handle) = RequestScope::cancellable();
        handle.cancel();
        // Must resolve immediately once the signal is set.
        scope.cancelled().await;
    }

    #[test]
    fn test_cancellable_scope_can_carry_a_deadline() {
        let (scope, _handle) = RequestScope::cancellable();
        let scope = scope.and_timeout(Duration::from_secs(5));
        assert!(scope.deadline().is_some());
        assert!(!scope.is_cancelled());
    }

    #[tokio::test]
    async fn test_deadline_elapses() {
        let scope = RequestScope::with_timeout(Duration::from_millis(10));
        assert!(scope.deadline().is_some());
        scope.deadline_elapsed().await;
    }
}
