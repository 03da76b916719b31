use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: HashMap<u64, Arc<AtomicBool>>,
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    // A panicking listener cannot leave the map half-updated; keep using it.
    registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Host-wide size-change broadcaster.
///
/// The host calls [`ResizeNotifier::notify`] from its event handler.
/// Subscribers observe a pending flag and consume it at a point of their
/// choosing, so a resize is never applied in the middle of a frame.
#[derive(Clone, Default)]
pub struct ResizeNotifier {
    registry: Arc<Mutex<Registry>>,
}

impl ResizeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener. Dropping the subscription unregisters it.
    pub fn subscribe(&self) -> ResizeSubscription {
        let mut registry = lock(&self.registry);
        let id = registry.next_id;
        registry.next_id += 1;

        let pending = Arc::new(AtomicBool::new(false));
        registry.listeners.insert(id, pending.clone());

        ResizeSubscription {
            id,
            pending,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Marks every live subscription as pending. Returns how many were notified.
    pub fn notify(&self) -> usize {
        let registry = lock(&self.registry);
        for pending in registry.listeners.values() {
            pending.store(true, Ordering::Release);
        }
        registry.listeners.len()
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.registry).listeners.len()
    }
}

/// Handle of one resize listener.
pub struct ResizeSubscription {
    id: u64,
    pending: Arc<AtomicBool>,
    registry: Weak<Mutex<Registry>>,
}

impl ResizeSubscription {
    /// Returns whether a resize arrived since the last call, clearing the flag.
    pub fn take_pending(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }
}

impl Drop for ResizeSubscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            lock(&registry).listeners.remove(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notify_reaches_every_subscriber() {
        let notifier = ResizeNotifier::new();
        let a = notifier.subscribe();
        let b = notifier.subscribe();

        assert_eq!(notifier.notify(), 2);
        assert!(a.is_pending());
        assert!(b.take_pending());
        assert!(!b.take_pending());
        assert!(a.take_pending());
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let notifier = ResizeNotifier::new();
        let a = notifier.subscribe();
        assert_eq!(notifier.listener_count(), 1);

        drop(a);
        assert_eq!(notifier.listener_count(), 0);
        assert_eq!(notifier.notify(), 0);
    }

    #[test]
    fn repeated_notifications_coalesce() {
        let notifier = ResizeNotifier::new();
        let a = notifier.subscribe();
        notifier.notify();
        notifier.notify();
        assert!(a.take_pending());
        assert!(!a.take_pending());
    }

    #[test]
    fn subscription_outlives_notifier() {
        let notifier = ResizeNotifier::new();
        let a = notifier.subscribe();
        drop(notifier);
        assert!(!a.take_pending());
        drop(a);
    }

    #[test]
    fn clones_share_listeners() {
        let notifier = ResizeNotifier::new();
        let host_side = notifier.clone();
        let a = notifier.subscribe();
        host_side.notify();
        assert!(a.take_pending());
    }
}
