use crate::backend::SnapshotBackend;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use warren_core::error::{Result, StoreError};

/// In-memory snapshot backend that records every write.
///
/// Clones share state, so a test can keep one handle while the store owns
/// another. Used by tests and for runs that do not need to survive restarts.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<MemoryState>>,
    save_delay: Option<Duration>,
}

#[derive(Debug, Default)]
struct MemoryState {
    contents: Option<String>,
    writes: Vec<String>,
    failures_left: usize,
}

impl MemoryBackend {
    /// Creates an empty backend, as if no snapshot had ever been saved.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend that already holds `contents`.
    pub fn with_contents(contents: impl Into<String>) -> Self {
        let backend = Self::new();
        backend.state.lock().contents = Some(contents.into());
        backend
    }

    /// Makes every save take `delay` before it lands.
    pub fn with_save_delay(mut self, delay: Duration) -> Self {
        self.save_delay = Some(delay);
        self
    }

    /// Makes the next `count` saves fail with an io error.
    pub fn fail_next_saves(&self, count: usize) {
        self.state.lock().failures_left = count;
    }

    /// The currently saved snapshot.
    pub fn contents(&self) -> Option<String> {
        self.state.lock().contents.clone()
    }

    /// Every successful save, oldest first.
    pub fn writes(&self) -> Vec<String> {
        self.state.lock().writes.clone()
    }

    pub fn write_count(&self) -> usize {
        self.state.lock().writes.len()
    }
}

#[async_trait]
impl SnapshotBackend for MemoryBackend {
    async fn load(&self) -> Result<Option<String>> {
        Ok(self.contents())
    }

    async fn save(&self, snapshot: String) -> Result<()> {
        if let Some(delay) = self.save_delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.lock();
        if state.failures_left > 0 {
            state.failures_left -= 1;
            return Err(StoreError::Io("simulated write failure".to_string()));
        }
        state.contents = Some(snapshot.clone());
        state.writes.push(snapshot);
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
