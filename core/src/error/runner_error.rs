// core/src/error/runner_error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to spawn process: {program}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to collect output of {program}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("empty invocation")]
    EmptyInvocation,
}
