//! Fire-and-forget work that must never hold up or fail a response:
//! activity logging and news view counters.
//!
//! Handlers call [`JobDispatcher::dispatch`] once the response is decided; a
//! single worker task drains the queue. Failures are logged and dropped.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::repos::activity::{self, NewActivity};
use crate::repos::news;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackgroundJob {
    RecordActivity(NewActivity),
    IncrementNewsViews { news_id: i64 },
}

impl BackgroundJob {
    fn kind(&self) -> &'static str {
        match self {
            BackgroundJob::RecordActivity(_) => "record_activity",
            BackgroundJob::IncrementNewsViews { .. } => "increment_news_views",
        }
    }
}

/// Cheap, cloneable handle for queueing jobs.
#[derive(Debug, Clone)]
pub struct JobDispatcher {
    tx: Option<UnboundedSender<BackgroundJob>>,
}

impl JobDispatcher {
    /// A dispatcher that discards every job.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn dispatch(&self, job: BackgroundJob) {
        let Some(tx) = &self.tx else {
            debug!(job = job.kind(), "background jobs disabled; dropping job");
            return;
        };
        if let Err(e) = tx.send(job) {
            warn!(job = e.0.kind(), "job worker has stopped; dropping job");
        }
    }

    pub fn record_activity(&self, entry: NewActivity) {
        self.dispatch(BackgroundJob::RecordActivity(entry));
    }
}

/// Owner side of the worker task, held by `main` for shutdown.
pub struct JobWorker {
    handle: JoinHandle<()>,
    cancel: CancellationToken,
}

impl JobWorker {
    /// Finish whatever is already queued, then stop.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.handle.await {
            warn!(error = %e, "job worker panicked");
        }
    }
}

/// The worker holds its own handle on the pool until it stops.
pub fn spawn_worker(db: Arc<DatabaseConnection>) -> (JobDispatcher, JobWorker) {
    let (tx, rx) = mpsc::unbounded_channel();
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(run(db, rx, cancel.clone()));

    (
        JobDispatcher { tx: Some(tx) },
        JobWorker { handle, cancel },
    )
}

async fn run(
    db: Arc<DatabaseConnection>,
    mut rx: UnboundedReceiver<BackgroundJob>,
    cancel: CancellationToken,
) {
    info!("job worker started");
    loop {
        tokio::select! {
            // Queued jobs win over cancellation so shutdown drains the queue.
            biased;
            job = rx.recv() => match job {
                Some(job) => run_logged(&db, job).await,
                None => break,
            },
            _ = cancel.cancelled() => break,
        }
    }
    info!("job worker stopped");
}

async fn run_logged(db: &DatabaseConnection, job: BackgroundJob) {
    let kind = job.kind();
    if let Err(e) = execute(db, job).await {
        warn!(job = kind, error = %e, "background job failed");
    }
}

pub async fn execute(db: &DatabaseConnection, job: BackgroundJob) -> Result<(), AppError> {
    match job {
        BackgroundJob::RecordActivity(entry) => activity::record(db, entry).await,
        BackgroundJob::IncrementNewsViews { news_id } => news::increment_views(db, news_id).await,
    }
}
