use crate::error::Result;
use crate::service::ShortenerService;
use async_trait::async_trait;
use warren_core::{Record, Store, StoreEvent};
use warren_generator::{CharSource, Pacer};

/// The job operations the HTTP and push layers need.
#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Validates `url` and enqueues a shortening job for it.
    fn submit(&self, url: &str) -> Result<()>;

    /// Retrieves the completed record for a short code.
    /// Returns `None` if no job has finished with that code.
    async fn resolve(&self, code: &str) -> Result<Option<Record>>;

    /// Describes the current state of `url`'s job as a store event.
    async fn current_state(&self, url: &str) -> Result<Option<StoreEvent>>;

    /// Acknowledges a completed job, cleaning up its pending record.
    async fn ack(&self, code: &str) -> Result<Option<Record>>;
}

#[async_trait]
impl<S: Store, C: CharSource, P: Pacer> Shortener for ShortenerService<S, C, P> {
    fn submit(&self, url: &str) -> Result<()> {
        // Jobs are detached; dropping the handle does not cancel them.
        ShortenerService::submit(self, url).map(|_| ())
    }

    async fn resolve(&self, code: &str) -> Result<Option<Record>> {
        ShortenerService::resolve(self, code).await
    }

    async fn current_state(&self, url: &str) -> Result<Option<StoreEvent>> {
        ShortenerService::current_state(self, url).await
    }

    async fn ack(&self, code: &str) -> Result<Option<Record>> {
        ShortenerService::ack(self, code).await
    }
}
