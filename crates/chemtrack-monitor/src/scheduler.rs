//! Periodic triggering of the chemical status check.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;
use uuid::Uuid;

use chemtrack_core::config::MonitorConfig;
use chemtrack_core::error::AppError;

use crate::monitor::ChemicalMonitor;
use crate::report::CycleOutcome;

type JobFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Drives a [`ChemicalMonitor`] on a fixed interval or a cron schedule.
pub struct MonitorScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    monitor: Arc<ChemicalMonitor>,
    config: MonitorConfig,
    /// Cycle spawned by `run_on_startup`, awaited on shutdown
    startup: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for MonitorScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitorScheduler")
            .field("config", &self.config)
            .finish()
    }
}

impl MonitorScheduler {
    /// Create a scheduler for the given monitor.
    pub async fn new(monitor: Arc<ChemicalMonitor>, config: MonitorConfig) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self {
            scheduler,
            monitor,
            config,
            startup: Mutex::new(None),
        })
    }

    /// Register the chemical status check. Does nothing when disabled.
    pub async fn register(&self) -> Result<(), AppError> {
        if !self.config.enabled {
            tracing::info!("Chemical status check disabled, nothing scheduled");
            return Ok(());
        }

        let run = cycle_job(Arc::clone(&self.monitor));
        let (job, schedule) = match &self.config.cron {
            Some(expression) => (
                CronJob::new_async(expression.as_str(), run),
                format!("cron '{}'", expression),
            ),
            None => (
                CronJob::new_repeated_async(
                    Duration::from_secs(self.config.interval_seconds),
                    run,
                ),
                format!("every {}s", self.config.interval_seconds),
            ),
        };
        let job = job.map_err(|e| {
            AppError::configuration(format!("Failed to create chemical_check schedule: {}", e))
        })?;

        self.scheduler.add(job).await.map_err(|e| {
            AppError::internal(format!("Failed to add chemical_check schedule: {}", e))
        })?;

        tracing::info!("Registered: chemical_check ({})", schedule);
        Ok(())
    }

    /// Start the scheduler, running one cycle immediately if configured to.
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!("Monitor scheduler started");

        if self.config.enabled && self.config.run_on_startup {
            let monitor = Arc::clone(&self.monitor);
            let handle = tokio::spawn(async move { run_once(&monitor).await });
            *self.startup.lock().await = Some(handle);
        }
        Ok(())
    }

    /// Stop scheduling and wait for an in-flight cycle to finish.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        self.scheduler
            .clone()
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {}", e)))?;

        let startup = self.startup.lock().await.take();
        if let Some(handle) = startup {
            if let Err(e) = handle.await {
                tracing::warn!("Startup chemical status check did not finish cleanly: {}", e);
            }
        }
        self.monitor.wait_idle().await;
        tracing::info!("Monitor scheduler shut down");
        Ok(())
    }

    /// Register, start, and run until `shutdown` flips to `true` or its
    /// sender is dropped.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> Result<(), AppError> {
        self.register().await?;
        self.start().await?;

        while !*shutdown.borrow_and_update() {
            if shutdown.changed().await.is_err() {
                break;
            }
        }

        tracing::info!("Shutdown signal received, stopping monitor scheduler");
        self.shutdown().await
    }
}

fn cycle_job(
    monitor: Arc<ChemicalMonitor>,
) -> impl FnMut(Uuid, JobScheduler) -> JobFuture + Send + Sync + 'static {
    move |_uuid, _lock| {
        let monitor = Arc::clone(&monitor);
        Box::pin(async move { run_once(&monitor).await }) as JobFuture
    }
}

/// Failures are logged by the monitor itself.
async fn run_once(monitor: &ChemicalMonitor) {
    match monitor.trigger().await {
        Ok(CycleOutcome::Completed(report)) => {
            tracing::debug!(
                cycle_id = %report.cycle_id,
                conditions = report.conditions.total(),
                "Scheduled chemical status check completed"
            );
        }
        Ok(CycleOutcome::Skipped) | Err(_) => {}
    }
}
