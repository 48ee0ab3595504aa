//! Long-running resync loop.
//!
//! A [`JobScheduler`] fires a sync every `SYNC_INTERVAL_SECS`. The
//! orchestrator sits behind a mutex, so a tick that arrives while a slow
//! fetch is still retrying waits for it instead of racing it.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use sheetsync_catalog::SyncOrchestrator;
use sheetsync_core::AppConfig;

/// Runs an initial sync, then resyncs on the configured interval until
/// ctrl-c.
///
/// # Errors
///
/// Returns an error if the scheduler cannot be started or the shutdown
/// signal handler cannot be installed.
pub(crate) async fn run(orchestrator: SyncOrchestrator, config: &AppConfig) -> anyhow::Result<()> {
    let orchestrator = Arc::new(Mutex::new(orchestrator));

    run_sync(&orchestrator).await;

    let mut scheduler = build_scheduler(Arc::clone(&orchestrator), config).await?;
    tracing::info!(
        interval_secs = config.sync_interval_secs,
        "watching document for changes"
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("received shutdown signal, stopping scheduler");
    scheduler.shutdown().await?;
    Ok(())
}

async fn build_scheduler(
    orchestrator: Arc<Mutex<SyncOrchestrator>>,
    config: &AppConfig,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_repeated_async(config.sync_interval(), move |_uuid, _lock| {
        let orchestrator = Arc::clone(&orchestrator);
        Box::pin(async move {
            run_sync(&orchestrator).await;
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;
    Ok(scheduler)
}

async fn run_sync(orchestrator: &Mutex<SyncOrchestrator>) {
    let mut orchestrator = orchestrator.lock().await;
    let catalog = orchestrator.sync().await;
    tracing::info!(
        products = catalog.len(),
        outcome = ?orchestrator.last_outcome(),
        synced_at = ?catalog.synced_at,
        "sync complete"
    );
}
