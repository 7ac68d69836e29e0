use std::sync::Arc;
use std::time::Instant;

use tokio::io::{AsyncBufRead, AsyncWrite, BufReader};
use tokio::sync::mpsc;
use tracing::Instrument;
use uuid::Uuid;

use crate::batcher::Batcher;
use crate::config::RunConfig;
use crate::error::RunError;
use crate::invocation::Invocation;
use crate::output::OutputMux;
use crate::pool::{CancelFlag, WorkerPool};
use crate::runner::{InvocationRunner, Outcome, ProcessRunner};
use crate::tokenizer::Tokenizer;

use super::feeder::feed;
use super::types::RunReport;

/// Reads standard input, runs real processes, writes to standard output/error.
pub async fn run_stdio(cfg: &RunConfig) -> Result<RunReport, RunError> {
    let mut output = OutputMux::stdio();
    run_batch(
        cfg,
        BufReader::new(tokio::io::stdin()),
        Arc::new(ProcessRunner::new()),
        &mut output,
    )
    .await
}

/// One complete run: tokenize `input`, dispatch invocations to
/// `cfg.max_procs()` workers, write every outcome to `output`.
///
/// Shutdown always happens in the same order: the feeder closes the work
/// queue, the workers return, then the result queue closes and is drained.
pub async fn run_batch<R, O, E>(
    cfg: &RunConfig,
    input: R,
    runner: Arc<dyn InvocationRunner>,
    output: &mut OutputMux<O, E>,
) -> Result<RunReport, RunError>
where
    R: AsyncBufRead + Unpin + Send + 'static,
    O: AsyncWrite + Unpin,
    E: AsyncWrite + Unpin,
{
    let run_id = Uuid::new_v4().to_string();
    let span = tracing::info_span!(target: "batchx.run", "run", run_id = %run_id);
    run_inner(cfg, input, runner, output, run_id)
        .instrument(span)
        .await
}

async fn run_inner<R, O, E>(
    cfg: &RunConfig,
    input: R,
    runner: Arc<dyn InvocationRunner>,
    output: &mut OutputMux<O, E>,
    run_id: String,
) -> Result<RunReport, RunError>
where
    R: AsyncBufRead + Unpin + Send + 'static,
    O: AsyncWrite + Unpin,
    E: AsyncWrite + Unpin,
{
    let started = Instant::now();
    let workers = cfg.max_procs();

    tracing::info!(
        target: "batchx.run",
        workers,
        max_args = cfg.max_args(),
        mode = ?cfg.mode(),
        program = cfg.command().first().map(String::as_str).unwrap_or_default(),
        "run started"
    );

    // Both queues hold at most one item per worker.
    let (work_tx, work_rx) = mpsc::channel::<Invocation>(workers);
    let (result_tx, mut result_rx) = mpsc::channel::<Outcome>(workers);
    let cancel = CancelFlag::new();

    let pool = WorkerPool::spawn(
        workers,
        work_rx,
        &result_tx,
        runner,
        cfg.mode(),
        cancel.clone(),
    );
    let metrics = pool.metrics();

    let feeder = tokio::spawn(
        feed(
            Tokenizer::new(input, cfg.delimiter()),
            Batcher::from_config(cfg),
            work_tx,
            cancel.clone(),
        )
        .in_current_span(),
    );

    // Closes the result queue only after every worker has returned.
    let watcher = tokio::spawn(
        async move {
            let reports = pool.join().await;
            drop(result_tx);
            reports
        }
        .in_current_span(),
    );

    let mut write_error = None;
    while let Some(outcome) = result_rx.recv().await {
        if write_error.is_some() {
            continue;
        }
        if let Err(e) = output.write(&outcome).await {
            tracing::error!(
                target: "batchx.run",
                error = %e,
                "output stream failed, stopping run"
            );
            cancel.set();
            write_error = Some(e);
        }
    }

    let worker_reports = watcher
        .await
        .map_err(|e| RunError::WorkerPanicked(e.to_string()))??;
    let feed_report = feeder
        .await
        .map_err(|e| RunError::WorkerPanicked(e.to_string()))?;

    if let Some(e) = write_error {
        return Err(RunError::Output(e));
    }

    let snap = metrics.snapshot();
    let report = RunReport {
        run_id,
        mode: cfg.mode(),
        tokens_read: feed_report.tokens,
        dispatched: feed_report.dispatched,
        executed: snap.started,
        succeeded: snap.succeeded,
        failed: snap.failed,
        peak_concurrency: snap.peak_active,
        cancelled: feed_report.stopped || cancel.is_set(),
        input_error: feed_report.input_error,
        duration_ms: started.elapsed().as_millis() as u64,
    };

    tracing::info!(
        target: "batchx.run",
        tokens = report.tokens_read,
        dispatched = report.dispatched,
        executed = report.executed,
        failed = report.failed,
        peak = report.peak_concurrency,
        cancelled = report.cancelled,
        workers = worker_reports.len(),
        duration_ms = report.duration_ms,
        "run finished"
    );

    Ok(report)
}
