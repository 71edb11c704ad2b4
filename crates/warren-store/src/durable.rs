use crate::backend::SnapshotBackend;
use crate::flusher::{self, FlushStats, Flusher};
use crate::notify::ChangeNotifier;
use crate::tables::Tables;
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};
use typed_builder::TypedBuilder;
use warren_core::error::{Result, StoreError};
use warren_core::{EventType, Record, RecordPatch, Store, StoreEvent, Table};

/// Configures a [`DurableStore`].
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct StoreSettings {
    /// Debounce window between a mutation and the snapshot write it triggers.
    #[builder(default = Duration::from_millis(500))]
    pub flush_delay: Duration,
}

/// Two-table store held in memory and persisted as whole-table snapshots.
///
/// Mutations apply to memory immediately and return without waiting for
/// disk; a background flush loop writes the full table set once per
/// debounce window. A crash loses at most the mutations since the last
/// completed write.
pub struct DurableStore {
    tables: Arc<RwLock<Tables>>,
    flusher: Arc<Flusher>,
    notifier: ChangeNotifier,
    flush_task: Mutex<Option<JoinHandle<()>>>,
}

impl DurableStore {
    /// Loads and heals the persisted tables, then starts the flush loop.
    ///
    /// Missing or empty state heals to empty tables and is written back
    /// before this returns. Present but unparseable state fails with
    /// [`StoreError::CorruptPersistedState`] and no store is created.
    pub async fn open(
        backend: impl SnapshotBackend,
        notifier: ChangeNotifier,
        settings: StoreSettings,
    ) -> Result<Self> {
        let backend: Arc<dyn SnapshotBackend> = Arc::new(backend);
        let location = backend.location();

        // Only absence heals; anything present but unreadable must not be
        // overwritten by the healing write.
        let raw = backend.load().await.inspect_err(|e| {
            error!(location = %location, error = %e, "cannot read persisted tables");
        })?;

        let loaded = Tables::from_snapshot(raw.as_deref()).map_err(|reason| {
            StoreError::CorruptPersistedState {
                path: location.clone(),
                reason,
            }
        })?;

        let tables = Arc::new(RwLock::new(loaded.tables));
        let flusher = Arc::new(Flusher::new(backend));

        if loaded.healed {
            info!(location = %location, "healed missing tables, writing them back");
            flusher.write(&tables).await;
        }

        let flush_task = tokio::spawn(flusher::run(
            Arc::clone(&flusher),
            Arc::clone(&tables),
            settings.flush_delay,
        ));

        {
            let tables = tables.read();
            info!(
                location = %location,
                pending = tables.pending.len(),
                completed = tables.completed.len(),
                "opened durable store"
            );
        }

        Ok(Self {
            tables,
            flusher,
            notifier,
            flush_task: Mutex::new(Some(flush_task)),
        })
    }

    pub fn flush_stats(&self) -> FlushStats {
        self.flusher.stats()
    }

    /// Whether mutations are waiting for the next snapshot write.
    pub fn has_unflushed_changes(&self) -> bool {
        self.flusher.is_dirty()
    }

    /// Stops the flush loop and writes one final snapshot.
    ///
    /// A snapshot write already in progress is allowed to land first.
    pub async fn shutdown(&self) {
        let task = self.flush_task.lock().take();
        if let Some(task) = task {
            self.flusher.stop();
            // Waits out a write in flight so the final one never overlaps it.
            if let Err(e) = task.await {
                warn!(error = %e, "flush loop ended abnormally");
            }
        }

        self.flusher.write(&self.tables).await;
        info!(location = %self.flusher.location(), "durable store shut down");
    }

    /// Applies a mutation under the write lock, schedules a flush and emits
    /// the event before the lock is released.
    fn commit<T>(&self, mutate: impl FnOnce(&mut Tables) -> Result<(T, Option<StoreEvent>)>) -> Result<T> {
        let mut tables = self.tables.write();
        let (output, event) = mutate(&mut tables)?;
        if let Some(event) = event {
            self.flusher.schedule();
            trace!(event = %event.name(), key = %event.data.original, "emitting store event");
            self.notifier.emit(&event);
        }
        Ok(output)
    }
}

impl Drop for DurableStore {
    fn drop(&mut self) {
        if let Some(task) = self.flush_task.get_mut().take() {
            task.abort();
        }
    }
}

impl std::fmt::Debug for DurableStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DurableStore")
            .field("location", &self.flusher.location())
            .field("notifier", &self.notifier)
            .finish()
    }
}

#[async_trait]
impl Store for DurableStore {
    async fn query(&self, table: Table, key: &str) -> Result<Option<Record>> {
        Ok(self.tables.read().get(table).get(key).cloned())
    }

    async fn insert(&self, table: Table, key: &str, record: Record) -> Result<Record> {
        let stored = self.commit(|tables| {
            tables.get_mut(table).insert(key.to_owned(), record.clone());
            let event = StoreEvent::new(table, EventType::Insert, record.clone());
            Ok((record, Some(event)))
        })?;
        debug!(table = %table, key = %key, "inserted record");
        Ok(stored)
    }

    async fn update(&self, table: Table, key: &str, patch: RecordPatch) -> Result<Record> {
        let updated = self.commit(|tables| {
            let Some(current) = tables.get_mut(table).get_mut(key) else {
                return Err(StoreError::NotFound {
                    table,
                    key: key.to_owned(),
                });
            };
            *current = current.patched(&patch);
            let updated = current.clone();
            let event = StoreEvent::new(table, EventType::Update, updated.clone());
            Ok((updated, Some(event)))
        })?;
        debug!(table = %table, key = %key, progress = updated.progress, "updated record");
        Ok(updated)
    }

    async fn remove(&self, table: Table, key: &str) -> Result<Option<Record>> {
        let removed = self.commit(|tables| {
            let removed = tables.get_mut(table).remove(key);
            let event = removed
                .clone()
                .map(|record| StoreEvent::new(table, EventType::Remove, record));
            Ok((removed, event))
        })?;
        debug!(table = %table, key = %key, existed = removed.is_some(), "removed record");
        Ok(removed)
    }

    async fn list(&self, table: Table) -> Result<Vec<(String, Record)>> {
        Ok(self
            .tables
            .read()
            .get(table)
            .iter()
            .map(|(key, record)| (key.clone(), record.clone()))
            .collect())
    }
}
