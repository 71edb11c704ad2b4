//! Durable two-table job-state store.
//!
//! [`DurableStore`] keeps the `pending` and `completed` tables in memory,
//! coalesces every mutation into a debounced snapshot write through a
//! [`SnapshotBackend`], and reports each mutation to the subscribers of a
//! [`ChangeNotifier`].
//!
//! # Example
//!
//! ```rust,no_run
//! use warren_core::{Record, Store, Table};
//! use warren_store::{ChangeNotifier, DurableStore, JsonFileBackend, StoreSettings};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let notifier = ChangeNotifier::new();
//! notifier.subscribe(|event| println!("{}", event.name()));
//!
//! let store = DurableStore::open(
//!     JsonFileBackend::new("data.json"),
//!     notifier,
//!     StoreSettings::builder().build(),
//! )
//! .await?;
//!
//! store
//!     .insert(Table::Pending, "http://a", Record::pending("http://a"))
//!     .await?;
//! store.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod durable;
pub mod flusher;
pub mod notify;
pub mod tables;

pub use backend::file::JsonFileBackend;
pub use backend::memory::MemoryBackend;
pub use backend::SnapshotBackend;
pub use durable::{DurableStore, StoreSettings};
pub use flusher::FlushStats;
pub use notify::{ChangeNotifier, SubscriptionId};
pub use tables::Tables;
