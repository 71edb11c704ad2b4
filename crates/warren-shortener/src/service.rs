use crate::error::{Result, ShortenerError};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use typed_builder::TypedBuilder;
use url::Url;
use warren_core::{
    EventType, Record, RecordPatch, ShortCode, Store, StoreEvent, Table,
};
use warren_generator::{CharSource, CodeProgress, Pacer, Step, DEFAULT_CODE_LENGTH};

/// Configures the jobs run by a [`ShortenerService`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct JobSettings {
    /// Length of a finished short code.
    #[builder(default = DEFAULT_CODE_LENGTH)]
    pub code_length: usize,
    /// Base the `shortenedURL` of completed records is built on.
    #[builder(default = "http://localhost:3000".to_string(), setter(into))]
    pub public_base_url: String,
}

/// Runs short-code generation jobs against a [`Store`].
///
/// A job inserts its `pending` record, appends one character per pacer tick
/// (persisting every step) and finally inserts the finished record into
/// `completed` under its short code. Jobs run as background tasks and cannot
/// be cancelled.
pub struct ShortenerService<S, C, P> {
    store: Arc<S>,
    chars: Arc<C>,
    pacer: Arc<P>,
    settings: Arc<JobSettings>,
}

impl<S, C, P> Clone for ShortenerService<S, C, P> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            chars: Arc::clone(&self.chars),
            pacer: Arc::clone(&self.pacer),
            settings: Arc::clone(&self.settings),
        }
    }
}

impl<S: Store, C: CharSource, P: Pacer> ShortenerService<S, C, P> {
    /// Creates a new `ShortenerService` over a shared store.
    pub fn new(store: Arc<S>, chars: C, pacer: P, settings: JobSettings) -> Self {
        Self {
            store,
            chars: Arc::new(chars),
            pacer: Arc::new(pacer),
            settings: Arc::new(settings),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn settings(&self) -> &JobSettings {
        &self.settings
    }

    /// Validates that the URL parses and uses http or https.
    pub fn validate_url(url: &str) -> Result<()> {
        if url.trim().is_empty() {
            return Err(ShortenerError::InvalidUrl(
                "url is a required parameter".to_string(),
            ));
        }

        let parsed = Url::parse(url)
            .map_err(|e| ShortenerError::InvalidUrl(format!("url is not formatted properly: {e}")))?;

        match parsed.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ShortenerError::InvalidUrl(format!(
                "url scheme must be http or https: {scheme}"
            ))),
        }
    }

    /// Validates `url` and enqueues a fresh job for it.
    ///
    /// Resubmitting a URL that already has a pending job starts a new job
    /// that overwrites the pending record.
    pub fn submit(&self, url: &str) -> Result<JoinHandle<()>> {
        Self::validate_url(url)?;
        let progress = CodeProgress::new(self.settings.code_length)?;
        info!(url = %url, "enqueued shortening job");
        Ok(self.spawn(url.to_string(), progress))
    }

    /// Enqueues a job that continues from an already-generated `prefix`.
    ///
    /// The pending record for `url` is expected to exist; if it is gone the
    /// job recreates it on its first step.
    pub fn resume(&self, url: &str, prefix: &str) -> Result<JoinHandle<()>> {
        let progress = CodeProgress::resume(prefix, self.settings.code_length)?;
        info!(url = %url, prefix = %prefix, "resuming shortening job");
        Ok(self.spawn(url.to_string(), progress))
    }

    fn spawn(&self, url: String, progress: CodeProgress) -> JoinHandle<()> {
        let service = self.clone();
        tokio::spawn(async move {
            if let Err(e) = service.generate(&url, progress).await {
                error!(url = %url, error = %e, "shortening job failed");
            }
        })
    }

    /// Runs one job to completion and returns the completed record.
    pub async fn generate(&self, url: &str, mut progress: CodeProgress) -> Result<Record> {
        if progress.code().is_empty() {
            self.store
                .insert(Table::Pending, url, Record::pending(url))
                .await?;
        }

        while !progress.is_finished() {
            self.pacer.pause().await;
            let step = progress.advance(self.chars.next_char())?;
            self.save_step(url, &step).await?;
        }

        let code = ShortCode::new_unchecked(progress.into_code());
        let record = Record {
            original: url.to_string(),
            short_code: code.to_string(),
            ack: false,
            progress: 1.0,
            shortened_url: Some(code.to_url(&self.settings.public_base_url)),
        };

        let completed = self
            .store
            .insert(Table::Completed, code.as_str(), record)
            .await?;
        info!(url = %url, code = %code, "shortening job completed");
        Ok(completed)
    }

    /// Persists one generation step, recreating the pending record if it
    /// disappeared underneath the job.
    async fn save_step(&self, url: &str, step: &Step) -> Result<()> {
        let patch = RecordPatch::progress(step.code.clone(), step.progress);
        match self.store.update(Table::Pending, url, patch).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => {
                warn!(url = %url, "pending record vanished mid-job, reinserting");
                let record = Record {
                    progress: step.progress,
                    short_code: step.code.clone(),
                    ..Record::pending(url)
                };
                self.store.insert(Table::Pending, url, record).await?;
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Looks up a completed job by its short code.
    ///
    /// Codes the generator could never have produced resolve to `None`
    /// without a store lookup.
    pub async fn resolve(&self, code: &str) -> Result<Option<Record>> {
        let code = match ShortCode::new(code) {
            Ok(code) => code,
            Err(e) => {
                debug!(code = %code, error = %e, "rejecting malformed short code");
                return Ok(None);
            }
        };
        Ok(self.store.query(Table::Completed, code.as_str()).await?)
    }

    /// The most useful event describing `url`'s job right now.
    ///
    /// A finished job whose completed record exists is reported as
    /// `completed:insert`, superseding its pending state; otherwise the
    /// pending record is reported as `pending:update`. `None` if there is no
    /// pending job for `url`.
    pub async fn current_state(&self, url: &str) -> Result<Option<StoreEvent>> {
        let Some(pending) = self.store.query(Table::Pending, url).await? else {
            return Ok(None);
        };

        if pending.is_finished() {
            if let Some(completed) = self
                .store
                .query(Table::Completed, &pending.short_code)
                .await?
            {
                return Ok(Some(StoreEvent::new(
                    Table::Completed,
                    EventType::Insert,
                    completed,
                )));
            }
        }

        Ok(Some(StoreEvent::new(
            Table::Pending,
            EventType::Update,
            pending,
        )))
    }

    /// Marks a completed job as received and drops its pending record.
    ///
    /// Returns `None` if no completed job has this code.
    pub async fn ack(&self, code: &str) -> Result<Option<Record>> {
        let acked = match self
            .store
            .update(Table::Completed, code, RecordPatch::ack())
            .await
        {
            Ok(record) => record,
            Err(e) if e.is_not_found() => {
                debug!(code = %code, "ack for unknown short code");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        self.store.remove(Table::Pending, &acked.original).await?;
        debug!(code = %code, url = %acked.original, "acknowledged completed job");
        Ok(Some(acked))
    }
}
