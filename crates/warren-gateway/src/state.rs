use std::sync::Arc;

use jiff::Timestamp;
use tokio::sync::broadcast;
use warren_core::StoreEvent;
use warren_shortener::Shortener;
use warren_store::DurableStore;

#[derive(Clone)]
pub struct AppState {
    shortener: Arc<dyn Shortener>,
    store: Arc<DurableStore>,
    events: broadcast::Sender<StoreEvent>,
    started_at: Timestamp,
}

impl AppState {
    /// `events` must be fed by the store's notifier, see
    /// [`warren_store::ChangeNotifier::broadcast`].
    pub fn new(
        shortener: Arc<dyn Shortener>,
        store: Arc<DurableStore>,
        events: broadcast::Sender<StoreEvent>,
    ) -> Self {
        Self {
            shortener,
            store,
            events,
            started_at: Timestamp::now(),
        }
    }

    pub fn shortener(&self) -> &dyn Shortener {
        self.shortener.as_ref()
    }

    pub fn store(&self) -> &DurableStore {
        &self.store
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }
}
