// core/src/error/run_error.rs
use thiserror::Error;

use super::ConfigError;

/// Failures of the run itself, as opposed to failures of individual invocations.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("invalid configuration")]
    Config(#[from] ConfigError),

    #[error("failed to write command output")]
    Output(#[source] std::io::Error),

    #[error("worker task panicked: {0}")]
    WorkerPanicked(String),
}
