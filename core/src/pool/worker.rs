use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::RunMode;
use crate::invocation::Invocation;
use crate::runner::{InvocationRunner, Outcome};

use super::{CancelFlag, PoolMetrics, WorkQueue};

/// Why a worker returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerExit {
    /// The work queue was closed and empty.
    Drained,
    /// The run was cancelled, by this worker or another one.
    Cancelled,
    /// Nobody is reading results any more.
    OutputClosed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerReport {
    pub id: usize,
    pub executed: u64,
    pub exit: WorkerExit,
}

pub(super) struct Worker {
    pub id: usize,
    pub queue: WorkQueue,
    pub results: mpsc::Sender<Outcome>,
    pub runner: Arc<dyn InvocationRunner>,
    pub mode: RunMode,
    pub cancel: CancelFlag,
    pub metrics: Arc<PoolMetrics>,
}

impl Worker {
    pub(super) async fn run(self) -> WorkerReport {
        let mut executed = 0u64;
        let exit = loop {
            if self.cancel.is_set() {
                break WorkerExit::Cancelled;
            }

            let Some(invocation) = self.next().await else {
                break if self.cancel.is_set() {
                    WorkerExit::Cancelled
                } else {
                    WorkerExit::Drained
                };
            };

            if self.cancel.is_set() {
                tracing::debug!(
                    target: "batchx.pool",
                    worker = self.id,
                    invocation = %invocation,
                    "dropping queued invocation after cancellation"
                );
                break WorkerExit::Cancelled;
            }

            executed += 1;
            let failed = self.execute(&invocation).await;

            if failed && self.mode == RunMode::ExitOnError {
                break WorkerExit::Cancelled;
            }
            if self.results.is_closed() {
                break WorkerExit::OutputClosed;
            }
        };

        tracing::debug!(
            target: "batchx.pool",
            worker = self.id,
            executed,
            ?exit,
            "worker finished"
        );
        WorkerReport {
            id: self.id,
            executed,
            exit,
        }
    }

    /// Takes the next invocation, giving up when the run is cancelled.
    async fn next(&self) -> Option<Invocation> {
        let mut queue = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return None,
            guard = self.queue.lock() => guard,
        };
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            inv = queue.recv() => inv,
        }
    }

    /// Runs one invocation and reports it. Returns whether it failed.
    async fn execute(&self, invocation: &Invocation) -> bool {
        tracing::debug!(
            target: "batchx.pool",
            worker = self.id,
            program = invocation.program().unwrap_or_default(),
            argc = invocation.args().len(),
            "starting invocation"
        );

        self.metrics.record_start();
        let outcome = self.runner.run(invocation).await;
        let failed = outcome.is_failure();
        self.metrics.record_finish(failed);

        if failed && self.mode == RunMode::ExitOnError && self.cancel.set() {
            tracing::info!(
                target: "batchx.pool",
                worker = self.id,
                invocation = %invocation,
                "invocation failed, cancelling run"
            );
        }

        if self.results.send(outcome).await.is_err() {
            tracing::warn!(
                target: "batchx.pool",
                worker = self.id,
                "result queue closed, outcome lost"
            );
        }
        failed
    }
}
