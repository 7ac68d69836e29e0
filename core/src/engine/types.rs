use crate::config::RunMode;

pub const EXIT_SUCCESS: i32 = 0;
/// Exit-on-error run in which some invocation failed.
pub const EXIT_RUN_FAILED: i32 = 1;
/// Bad flags or configuration; nothing was read or executed.
pub const EXIT_USAGE: i32 = 2;

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub run_id: String,
    pub mode: RunMode,
    /// Tokens taken from the input.
    pub tokens_read: u64,
    /// Invocations placed on the work queue.
    pub dispatched: u64,
    /// Invocations a worker actually started.
    pub executed: u64,
    pub succeeded: u64,
    pub failed: u64,
    /// Most invocations that were running at the same moment.
    pub peak_concurrency: usize,
    /// Dispatching stopped before the input was exhausted.
    pub cancelled: bool,
    /// Read error that ended the input early, if any.
    pub input_error: Option<String>,
    pub duration_ms: u64,
}

impl RunReport {
    pub fn exit_code(&self) -> i32 {
        match self.mode {
            RunMode::ContinueOnError => EXIT_SUCCESS,
            RunMode::ExitOnError if self.failed > 0 => EXIT_RUN_FAILED,
            RunMode::ExitOnError => EXIT_SUCCESS,
        }
    }
}
