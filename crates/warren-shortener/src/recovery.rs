//! Startup recovery of jobs interrupted by a crash.
//!
//! Every `pending` record whose short code has no `completed` record belongs
//! to a job that was still generating when the process stopped. Recovery
//! re-enqueues each of them, continuing from the characters already stored.
//! Nothing is replayed to clients: a client still interested in a job asks
//! for its current state when it reconnects.

use crate::error::Result;
use crate::service::ShortenerService;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use warren_core::{Store, Table};
use warren_generator::{CharSource, Pacer};

/// A job re-enqueued by [`ShortenerService::recover`].
#[derive(Debug)]
pub struct ResumedJob {
    pub url: String,
    /// Characters that were already generated before the restart.
    pub prefix: String,
    pub handle: JoinHandle<()>,
}

/// Outcome of a recovery pass.
#[derive(Debug, Default)]
pub struct RecoveryReport {
    pub resumed: Vec<ResumedJob>,
    /// Pending records whose job had already completed.
    pub already_completed: usize,
    /// Pending records whose stored code could not be resumed.
    pub skipped: usize,
}

impl RecoveryReport {
    /// Waits for every resumed job to finish.
    pub async fn join_all(self) {
        for job in self.resumed {
            // Job failures are logged by the job itself.
            let _ = job.handle.await;
        }
    }
}

impl<S: Store, C: CharSource, P: Pacer> ShortenerService<S, C, P> {
    /// Resumes every job left unfinished in the `pending` table.
    ///
    /// Meant to run once at startup, before new work is accepted.
    pub async fn recover(&self) -> Result<RecoveryReport> {
        let mut report = RecoveryReport::default();

        for (url, record) in self.store().list(Table::Pending).await? {
            if !record.short_code.is_empty()
                && self
                    .store()
                    .query(Table::Completed, &record.short_code)
                    .await?
                    .is_some()
            {
                report.already_completed += 1;
                continue;
            }

            match self.resume(&url, &record.short_code) {
                Ok(handle) => report.resumed.push(ResumedJob {
                    url,
                    prefix: record.short_code,
                    handle,
                }),
                Err(e) => {
                    warn!(url = %url, code = %record.short_code, error = %e, "cannot resume pending job");
                    report.skipped += 1;
                }
            }
        }

        info!(
            resumed = report.resumed.len(),
            already_completed = report.already_completed,
            skipped = report.skipped,
            "recovery finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use crate::service::{JobSettings, ShortenerService};
    use parking_lot::Mutex;
    use std::sync::Arc;
    use warren_core::{Record, Store, StoreEvent, Table};
    use warren_generator::{NoDelay, SequenceChars};
    use warren_store::{ChangeNotifier, DurableStore, MemoryBackend, StoreSettings, Tables};

    fn snapshot(pending: &[(&str, &str)], completed: &[(&str, &str)]) -> String {
        let mut tables = Tables::default();
        for (url, code) in pending {
            tables.pending.insert(
                url.to_string(),
                Record {
                    short_code: code.to_string(),
                    progress: code.len() as f64 / 10.0,
                    ..Record::pending(*url)
                },
            );
        }
        for (code, url) in completed {
            tables.completed.insert(
                code.to_string(),
                Record {
                    short_code: code.to_string(),
                    progress: 1.0,
                    ..Record::pending(*url)
                },
            );
        }
        tables.to_snapshot().unwrap()
    }

    async fn service_over(
        contents: String,
        notifier: ChangeNotifier,
    ) -> ShortenerService<DurableStore, SequenceChars, NoDelay> {
        let store = DurableStore::open(
            MemoryBackend::with_contents(contents),
            notifier,
            StoreSettings::builder().build(),
        )
        .await
        .unwrap();
        ShortenerService::new(
            Arc::new(store),
            SequenceChars::new("x"),
            NoDelay,
            JobSettings::builder().build(),
        )
    }

    #[tokio::test]
    async fn resumes_from_existing_prefix() {
        let notifier = ChangeNotifier::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        {
            let seen = Arc::clone(&seen);
            notifier.subscribe(move |event: &StoreEvent| {
                seen.lock().push((event.name(), event.data.short_code.clone()));
            });
        }
        let service = service_over(snapshot(&[("http://a", "abcd")], &[]), notifier).await;

        let report = service.recover().await.unwrap();
        assert_eq!(report.resumed.len(), 1);
        assert_eq!(report.resumed[0].url, "http://a");
        assert_eq!(report.resumed[0].prefix, "abcd");
        report.join_all().await;

        let done = service.resolve("abcdxxxxxx").await.unwrap().unwrap();
        assert_eq!(done.original, "http://a");
        assert_eq!(done.progress, 1.0);

        let seen = seen.lock().clone();
        // No restart from zero: the first event already carries the prefix.
        assert_eq!(seen[0], ("pending:update".to_string(), "abcdx".to_string()));
        assert!(!seen.iter().any(|(name, _)| name == "pending:insert"));
        assert_eq!(seen.len(), 7);
    }

    #[tokio::test]
    async fn leaves_completed_jobs_alone() {
        let contents = snapshot(&[("http://a", "abcdefghij")], &[("abcdefghij", "http://a")]);
        let service = service_over(contents, ChangeNotifier::new()).await;

        let report = service.recover().await.unwrap();

        assert!(report.resumed.is_empty());
        assert_eq!(report.already_completed, 1);
        // Cleanup of the pending record is left to the ack path.
        assert!(service
            .store()
            .query(Table::Pending, "http://a")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn finished_code_without_completed_record_is_completed() {
        let contents = snapshot(&[("http://a", "abcdefghij")], &[]);
        let service = service_over(contents, ChangeNotifier::new()).await;

        let report = service.recover().await.unwrap();
        assert_eq!(report.resumed.len(), 1);
        report.join_all().await;

        let done = service.resolve("abcdefghij").await.unwrap().unwrap();
        assert_eq!(done.original, "http://a");
    }

    #[tokio::test]
    async fn empty_prefix_restarts_the_job() {
        let contents = snapshot(&[("http://a", "")], &[]);
        let service = service_over(contents, ChangeNotifier::new()).await;

        service.recover().await.unwrap().join_all().await;

        assert!(service.resolve("xxxxxxxxxx").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn unresumable_codes_are_skipped() {
        let contents = snapshot(&[("http://a", "ABC"), ("http://b", "abc")], &[]);
        let service = service_over(contents, ChangeNotifier::new()).await;

        let report = service.recover().await.unwrap();

        assert_eq!(report.skipped, 1);
        assert_eq!(report.resumed.len(), 1);
        assert_eq!(report.resumed[0].url, "http://b");
        report.join_all().await;
    }

    #[tokio::test]
    async fn nothing_to_recover_on_empty_store() {
        let service = service_over(String::new(), ChangeNotifier::new()).await;

        let report = service.recover().await.unwrap();

        assert!(report.resumed.is_empty());
        assert_eq!(report.already_completed, 0);
        assert_eq!(report.skipped, 0);
    }
}
