//! Short-code job producer.
//!
//! This crate provides [`ShortenerService`], which runs slow short-code
//! generation jobs against a [`warren_core::Store`], and the startup
//! [`recovery`] pass that resumes jobs interrupted by a crash.

pub mod error;
pub mod recovery;
pub mod service;
pub mod shortener;

pub use error::ShortenerError;
pub use recovery::{RecoveryReport, ResumedJob};
pub use service::{JobSettings, ShortenerService};
pub use shortener::Shortener;
