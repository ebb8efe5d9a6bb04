//! Per-agent busy indicator.

use tokio::sync::watch;

/// Whether an agent is waiting to retry a failed call.
///
/// Each engine owns its own indicator; hosts subscribe per agent.
pub struct ThinkingIndicator {
    tx: watch::Sender<bool>,
}

impl ThinkingIndicator {
    /// Create an idle indicator.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Update the indicator, notifying subscribers only on change.
    pub fn set(&self, thinking: bool) {
        self.tx.send_if_modified(|current| {
            let changed = *current != thinking;
            *current = thinking;
            changed
        });
    }

    /// Current value.
    pub fn get(&self) -> bool {
        *self.tx.borrow()
    }

    /// Subscribe to changes.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for ThinkingIndicator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_changes_notify() {
        let indicator = ThinkingIndicator::new();
        let mut rx = indicator.subscribe();

        indicator.set(false);
        assert!(!rx.has_changed().unwrap());

        indicator.set(true);
        assert!(rx.has_changed().unwrap());
        assert!(*rx.borrow_and_update());
        assert!(indicator.get());
    }

    #[test]
    fn test_indicators_are_independent() {
        let a = ThinkingIndicator::new();
        let b = ThinkingIndicator::new();
        a.set(true);
        assert!(a.get());
        assert!(!b.get());
    }
}
