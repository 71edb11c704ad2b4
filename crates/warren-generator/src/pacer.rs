use async_trait::async_trait;
use std::time::Duration;

/// Spaces out the characters of a code in time.
///
/// Every wait is a suspension point, so other jobs and requests run while a
/// code is being generated.
#[async_trait]
pub trait Pacer: Send + Sync + 'static {
    /// Waits before the next character is produced.
    async fn pause(&self);
}

/// Waits a fixed duration on the tokio timer before every character.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

impl FixedDelay {
    pub fn from_millis(millis: u64) -> Self {
        Self(Duration::from_millis(millis))
    }
}

#[async_trait]
impl Pacer for FixedDelay {
    async fn pause(&self) {
        tokio::time::sleep(self.0).await;
    }
}

/// Never waits beyond yielding to the scheduler.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait]
impl Pacer for NoDelay {
    async fn pause(&self) {
        tokio::task::yield_now().await;
    }
}
