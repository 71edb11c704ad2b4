use crate::error::Result;
use crate::record::{Record, RecordPatch, Table};
use async_trait::async_trait;

/// The two-table job-state store.
///
/// Every operation is a point operation on one key of one table. Callers
/// always receive copies; records are never handed out for in-place mutation.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// Retrieves the record stored at `key`.
    /// Returns `None` if the table has no such key.
    async fn query(&self, table: Table, key: &str) -> Result<Option<Record>>;

    /// Stores `record` at `key`, replacing any existing record.
    async fn insert(&self, table: Table, key: &str, record: Record) -> Result<Record>;

    /// Overwrites the fields set in `patch` on the record at `key`.
    /// Returns `Err(NotFound)` if there is no record at `key`.
    async fn update(&self, table: Table, key: &str, patch: RecordPatch) -> Result<Record>;

    /// Removes the record at `key`, returning it if it existed.
    async fn remove(&self, table: Table, key: &str) -> Result<Option<Record>>;

    /// Lists every `(key, record)` pair of a table.
    ///
    /// Intended for startup recovery only; request paths use point lookups.
    async fn list(&self, table: Table) -> Result<Vec<(String, Record)>>;
}
