//! Fixed-size worker pool fed from a bounded queue.

mod cancel;
mod metrics;
mod worker;

use std::sync::Arc;

use futures::stream::FuturesUnordered;
use futures::StreamExt;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use crate::config::RunMode;
use crate::error::RunError;
use crate::invocation::Invocation;
use crate::runner::{InvocationRunner, Outcome};

pub use cancel::CancelFlag;
pub use metrics::{MetricsSnapshot, PoolMetrics};
pub use worker::{WorkerExit, WorkerReport};

/// Receiving half of the work queue, shared by every worker.
pub type WorkQueue = Arc<Mutex<mpsc::Receiver<Invocation>>>;

/// Handles of the running workers.
pub struct WorkerPool {
    handles: Vec<JoinHandle<WorkerReport>>,
    metrics: Arc<PoolMetrics>,
}

impl WorkerPool {
    /// Starts `size` workers pulling from `work`.
    ///
    /// Each worker holds its own clone of `results`; the result queue closes
    /// once every worker has returned and the caller dropped its sender.
    pub fn spawn(
        size: usize,
        work: mpsc::Receiver<Invocation>,
        results: &mpsc::Sender<Outcome>,
        runner: Arc<dyn InvocationRunner>,
        mode: RunMode,
        cancel: CancelFlag,
    ) -> Self {
        let queue: WorkQueue = Arc::new(Mutex::new(work));
        let metrics = Arc::new(PoolMetrics::new());

        let handles = (0..size)
            .map(|id| {
                let worker = worker::Worker {
                    id,
                    queue: queue.clone(),
                    results: results.clone(),
                    runner: runner.clone(),
                    mode,
                    cancel: cancel.clone(),
                    metrics: metrics.clone(),
                };
                tokio::spawn(worker.run())
            })
            .collect();

        tracing::debug!(
            target: "batchx.pool",
            workers = size,
            runner = runner.name(),
            "pool started"
        );

        Self { handles, metrics }
    }

    pub fn metrics(&self) -> Arc<PoolMetrics> {
        self.metrics.clone()
    }

    /// Waits for every worker to return.
    pub async fn join(self) -> Result<Vec<WorkerReport>, RunError> {
        let mut pending: FuturesUnordered<_> = self.handles.into_iter().collect();
        let mut reports = Vec::with_capacity(pending.len());
        let mut panicked = None;

        while let Some(res) = pending.next().await {
            match res {
                Ok(report) => reports.push(report),
                Err(e) => {
                    tracing::error!(target: "batchx.pool", error = %e, "worker task failed");
                    panicked.get_or_insert_with(|| e.to_string());
                }
            }
        }

        match panicked {
            Some(msg) => Err(RunError::WorkerPanicked(msg)),
            None => {
                reports.sort_by_key(|r| r.id);
                Ok(reports)
            }
        }
    }
}
