use dashmap::DashMap;
use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::trace;
use warren_core::StoreEvent;

type Listener = Arc<dyn Fn(&StoreEvent) + Send + Sync>;

/// Identifies one registration in a [`ChangeNotifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Registry of callbacks that receive every store mutation.
///
/// Callbacks run synchronously on the mutating task while the store's table
/// lock is held, which is what keeps events for one key in mutation order.
/// They must therefore be quick and must not call back into the store.
/// Events emitted while nobody is subscribed are dropped.
///
/// Clones share the same registry.
#[derive(Clone, Default)]
pub struct ChangeNotifier {
    registry: Arc<Registry>,
}

#[derive(Default)]
struct Registry {
    next_id: AtomicU64,
    listeners: DashMap<SubscriptionId, Listener>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` for every subsequent event.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&StoreEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.registry.next_id.fetch_add(1, Ordering::Relaxed));
        self.registry.listeners.insert(id, Arc::new(listener));
        trace!(subscription = %id, "registered store listener");
        id
    }

    /// Removes a registration. Returns `true` if it existed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.registry.listeners.remove(&id).is_some()
    }

    /// Registers a listener that forwards every event into a broadcast
    /// channel of the given capacity and returns its sender.
    ///
    /// Receivers obtained from the sender see events in emission order; a
    /// receiver that falls behind by more than `capacity` events lags.
    pub fn broadcast(&self, capacity: usize) -> (SubscriptionId, broadcast::Sender<StoreEvent>) {
        let (tx, _) = broadcast::channel(capacity);
        let forward = tx.clone();
        let id = self.subscribe(move |event| {
            // No receivers is fine.
            let _ = forward.send(event.clone());
        });
        (id, tx)
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.listeners.len()
    }

    /// Delivers `event` to every registered listener.
    pub(crate) fn emit(&self, event: &StoreEvent) {
        // Snapshot first so a listener may (un)subscribe without deadlocking a shard.
        let listeners: Vec<Listener> = self
            .registry
            .listeners
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        for listener in listeners {
            listener(event);
        }
    }
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use warren_core::{EventType, Record, Table};

    fn event(url: &str) -> StoreEvent {
        StoreEvent::new(Table::Pending, EventType::Insert, Record::pending(url))
    }

    #[test]
    fn delivers_to_every_subscriber() {
        let notifier = ChangeNotifier::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for tag in ["a", "b"] {
            let seen = Arc::clone(&seen);
            notifier.subscribe(move |event| {
                seen.lock().push(format!("{tag}:{}", event.data.original));
            });
        }

        notifier.emit(&event("http://x"));

        let mut seen = seen.lock().clone();
        seen.sort();
        assert_eq!(seen, vec!["a:http://x", "b:http://x"]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let notifier = ChangeNotifier::new();
        let count = Arc::new(AtomicU64::new(0));

        let counter = Arc::clone(&count);
        let id = notifier.subscribe(move |_| {
            counter.fetch_add(1, Ordering::Relaxed);
        });

        notifier.emit(&event("http://x"));
        assert!(notifier.unsubscribe(id));
        assert!(!notifier.unsubscribe(id));
        notifier.emit(&event("http://x"));

        assert_eq!(count.load(Ordering::Relaxed), 1);
        assert_eq!(notifier.subscriber_count(), 0);
    }

    #[test]
    fn emit_without_subscribers_is_a_no_op() {
        ChangeNotifier::new().emit(&event("http://x"));
    }

    #[tokio::test]
    async fn broadcast_forwards_in_order() {
        let notifier = ChangeNotifier::new();
        let (_, tx) = notifier.broadcast(16);
        let mut rx = tx.subscribe();

        notifier.emit(&event("http://1"));
        notifier.emit(&event("http://2"));

        assert_eq!(rx.recv().await.unwrap().data.original, "http://1");
        assert_eq!(rx.recv().await.unwrap().data.original, "http://2");
    }
}
