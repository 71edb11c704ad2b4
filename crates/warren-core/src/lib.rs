//! Core types and traits for the Warren URL shortener.
//!
//! This crate provides the job record model, the two-table [`Store`]
//! contract and the change events emitted by store implementations. It is
//! shared by the store, the job producer and the gateway.

pub mod error;
pub mod event;
pub mod record;
pub mod shortcode;
pub mod store;

pub use error::{InvalidShortCode, StoreError};
pub use event::{EventType, StoreEvent};
pub use record::{Record, RecordPatch, Table};
pub use shortcode::ShortCode;
pub use store::Store;
