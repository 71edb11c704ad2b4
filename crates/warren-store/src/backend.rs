pub mod file;
pub mod memory;

use async_trait::async_trait;
use warren_core::error::Result;

/// Where the serialized table set lives between restarts.
///
/// Backends move opaque snapshot text; parsing and healing are done by the
/// store.
#[async_trait]
pub trait SnapshotBackend: Send + Sync + 'static {
    /// Reads the last saved snapshot.
    /// Returns `None` if nothing has been saved yet.
    async fn load(&self) -> Result<Option<String>>;

    /// Replaces the saved snapshot with `snapshot`.
    async fn save(&self, snapshot: String) -> Result<()>;

    /// Human-readable location, used in logs and corruption errors.
    fn location(&self) -> String;
}
