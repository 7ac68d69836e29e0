use tokio::io::AsyncBufRead;
use tokio::sync::mpsc;

use crate::batcher::Batcher;
use crate::invocation::Invocation;
use crate::pool::CancelFlag;
use crate::tokenizer::Tokenizer;

/// What the feeder did before it closed the work queue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedReport {
    pub tokens: u64,
    pub dispatched: u64,
    /// Stopped by cancellation or because no worker is left to take work.
    pub stopped: bool,
    pub input_error: Option<String>,
}

/// Drains tokenizer → batcher into the work queue.
///
/// The queue closes when this returns (the sender is dropped). Input is not
/// read past the point where cancellation is observed.
pub(super) async fn feed<R>(
    mut tokenizer: Tokenizer<R>,
    mut batcher: Batcher,
    work: mpsc::Sender<Invocation>,
    cancel: CancelFlag,
) -> FeedReport
where
    R: AsyncBufRead + Unpin,
{
    let mut report = FeedReport::default();

    loop {
        if cancel.is_set() {
            report.stopped = true;
            break;
        }

        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                report.stopped = true;
                break;
            }
            next = tokenizer.next_token() => next,
        };

        let token = match next {
            Ok(Some(token)) => token,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(
                    target: "batchx.feeder",
                    error = %e,
                    tokens = tokenizer.tokens_read(),
                    "input read failed, treating as end of input"
                );
                report.input_error = Some(e.to_string());
                break;
            }
        };

        if let Some(invocation) = batcher.push(token) {
            if !dispatch(&work, &cancel, invocation, &mut report).await {
                break;
            }
        }
    }

    if !report.stopped {
        if let Some(invocation) = batcher.finish() {
            dispatch(&work, &cancel, invocation, &mut report).await;
        }
    } else if batcher.pending() > 0 {
        tracing::debug!(
            target: "batchx.feeder",
            pending = batcher.pending(),
            "discarding partial batch after cancellation"
        );
    }

    report.tokens = tokenizer.tokens_read();
    tracing::debug!(
        target: "batchx.feeder",
        tokens = report.tokens,
        dispatched = report.dispatched,
        stopped = report.stopped,
        "work queue closed"
    );
    report
}

/// Enqueues one invocation. Returns false when feeding must stop.
async fn dispatch(
    work: &mpsc::Sender<Invocation>,
    cancel: &CancelFlag,
    invocation: Invocation,
    report: &mut FeedReport,
) -> bool {
    if cancel.is_set() {
        report.stopped = true;
        return false;
    }

    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            report.stopped = true;
            false
        }
        sent = work.send(invocation) => match sent {
            Ok(()) => {
                report.dispatched += 1;
                true
            }
            Err(_) => {
                // every worker has returned
                report.stopped = true;
                false
            }
        },
    }
}
