use crate::backend::SnapshotBackend;
use crate::tables::Tables;
use jiff::Timestamp;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tracing::{debug, error};

/// Counters describing the snapshot writes performed so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FlushStats {
    /// Successful snapshot writes.
    pub writes: u64,
    /// Snapshot writes that failed and were rescheduled.
    pub failures: u64,
    /// When the last successful write finished.
    pub last_flush_at: Option<Timestamp>,
}

/// Debounced, single-slot snapshot writer.
///
/// `dirty` is the only slot: the first mutation after a write wakes the
/// flush loop, later mutations just find the slot taken. The slot is cleared
/// right before the snapshot is taken, so a mutation landing during an
/// in-flight write re-arms exactly one follow-up write.
pub(crate) struct Flusher {
    backend: Arc<dyn SnapshotBackend>,
    dirty: AtomicBool,
    wake: Notify,
    stop: Notify,
    stats: Mutex<FlushStats>,
}

impl Flusher {
    pub(crate) fn new(backend: Arc<dyn SnapshotBackend>) -> Self {
        Self {
            backend,
            dirty: AtomicBool::new(false),
            wake: Notify::new(),
            stop: Notify::new(),
            stats: Mutex::new(FlushStats::default()),
        }
    }

    /// Marks the tables dirty, waking the flush loop if no write is scheduled.
    pub(crate) fn schedule(&self) {
        if !self.dirty.swap(true, Ordering::AcqRel) {
            self.wake.notify_one();
        }
    }

    /// Asks the flush loop to exit. A write already in progress finishes
    /// first; the permit is kept if the loop is not waiting right now.
    pub(crate) fn stop(&self) {
        self.stop.notify_one();
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    pub(crate) fn stats(&self) -> FlushStats {
        *self.stats.lock()
    }

    pub(crate) fn location(&self) -> String {
        self.backend.location()
    }

    /// Writes the current tables through the backend.
    ///
    /// A failed write is logged and rescheduled; it never propagates.
    pub(crate) async fn write(&self, tables: &RwLock<Tables>) {
        self.dirty.store(false, Ordering::Release);

        let snapshot = tables.read().to_snapshot();
        let snapshot = match snapshot {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!(error = %e, "failed to serialize tables");
                self.stats.lock().failures += 1;
                self.schedule();
                return;
            }
        };

        match self.backend.save(snapshot).await {
            Ok(()) => {
                let mut stats = self.stats.lock();
                stats.writes += 1;
                stats.last_flush_at = Some(Timestamp::now());
                debug!(
                    location = %self.backend.location(),
                    writes = stats.writes,
                    "flushed tables"
                );
            }
            Err(e) => {
                error!(
                    location = %self.backend.location(),
                    error = %e,
                    "failed to flush tables, retrying on the next window"
                );
                self.stats.lock().failures += 1;
                self.schedule();
            }
        }
    }
}

/// Flush loop: wait for a mutation, let the debounce window pass, write.
///
/// Stop requests are only observed while waiting, never during a write.
pub(crate) async fn run(flusher: Arc<Flusher>, tables: Arc<RwLock<Tables>>, delay: Duration) {
    loop {
        tokio::select! {
            _ = flusher.wake.notified() => {}
            _ = flusher.stop.notified() => break,
        }
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = flusher.stop.notified() => break,
        }
        flusher.write(&tables).await;
    }
    debug!(location = %flusher.location(), "flush loop stopped");
}
