//! The shared "pending" flag observed by the UI while a cart operation runs.

use std::sync::Arc;

use tokio::sync::watch;

/// A boolean broadcast to every subscriber.
///
/// It signals that a restore is in flight; it does not lock anything.
/// Callers are expected to disable restore actions while it is set.
#[derive(Debug, Clone)]
pub struct PendingFlag {
    tx: Arc<watch::Sender<bool>>,
}

impl PendingFlag {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Returns a receiver that observes every change of the flag.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        *self.tx.borrow()
    }

    /// Raises the flag until the returned guard is dropped.
    #[must_use = "the flag is cleared as soon as the guard is dropped"]
    pub fn hold(&self) -> PendingGuard {
        self.tx.send_replace(true);
        PendingGuard {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl Default for PendingFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Clears the pending flag on drop, on every exit path.
#[derive(Debug)]
pub struct PendingGuard {
    tx: Arc<watch::Sender<bool>>,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.tx.send_replace(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_raises_and_clears() {
        let flag = PendingFlag::new();
        assert!(!flag.is_pending());

        let guard = flag.hold();
        assert!(flag.is_pending());
        assert!(flag.clone().is_pending());

        drop(guard);
        assert!(!flag.is_pending());
    }

    #[tokio::test]
    async fn subscribers_see_both_transitions() {
        let flag = PendingFlag::new();
        let mut rx = flag.subscribe();

        let guard = flag.hold();
        rx.changed().await.unwrap();
        assert!(*rx.borrow_and_update());

        drop(guard);
        rx.changed().await.unwrap();
        assert!(!*rx.borrow_and_update());
    }

    #[test]
    fn guard_clears_on_early_return() {
        fn failing_step(flag: &PendingFlag) -> Result<(), &'static str> {
            let _guard = flag.hold();
            Err("remote rejected")
        }

        let flag = PendingFlag::new();
        assert!(failing_step(&flag).is_err());
        assert!(!flag.is_pending());
    }
}
