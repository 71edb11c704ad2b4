mod cli;
mod telemetry;

use crate::cli::CLI;
use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use warren_gateway::{App, AppState};
use warren_generator::{FixedDelay, RandomChars};
use warren_shortener::{JobSettings, ShortenerService};
use warren_store::{ChangeNotifier, DurableStore, JsonFileBackend, StoreSettings};

const EVENT_CHANNEL_CAPACITY: usize = 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();
    telemetry::init(config.log_format);

    info!(
        listen_addr = %config.listen_addr,
        data_file = %config.data_file.display(),
        public_base_url = %config.public_base_url,
        flush_delay_ms = config.flush_delay_ms,
        char_delay_ms = config.char_delay_ms,
        code_length = config.code_length,
        log_format = %config.log_format,
        "starting warren"
    );

    let notifier = ChangeNotifier::new();
    let (_, events) = notifier.broadcast(EVENT_CHANNEL_CAPACITY);

    let store = DurableStore::open(
        JsonFileBackend::new(&config.data_file),
        notifier,
        StoreSettings::builder()
            .flush_delay(Duration::from_millis(config.flush_delay_ms))
            .build(),
    )
    .await
    .inspect_err(|e| error!(error = %e, "refusing to start"))
    .context("failed to open the job store")?;
    let store = Arc::new(store);

    let shortener = ShortenerService::new(
        Arc::clone(&store),
        RandomChars,
        FixedDelay::from_millis(config.char_delay_ms),
        JobSettings::builder()
            .code_length(config.code_length)
            .public_base_url(config.public_base_url)
            .build(),
    );

    // Resumed jobs run detached alongside new ones.
    shortener
        .recover()
        .await
        .context("failed to recover pending jobs")?;

    let app = App::router(AppState::new(
        Arc::new(shortener),
        Arc::clone(&store),
        events,
    ));

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shutting down, writing final snapshot");
    store.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
