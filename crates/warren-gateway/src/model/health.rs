use jiff::Timestamp;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub started_at: Timestamp,
    /// Snapshot writes that reached the backend.
    pub flushes: u64,
    pub failed_flushes: u64,
    pub last_flush_at: Option<Timestamp>,
}
