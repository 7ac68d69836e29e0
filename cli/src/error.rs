use batchx_core::api::{ConfigError, RunError, EXIT_RUN_FAILED, EXIT_USAGE};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Run(#[from] RunError),
    #[error("logging setup failed: {0:#}")]
    Logging(anyhow::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) | CliError::Logging(_) => EXIT_USAGE,
            CliError::Run(RunError::Config(_)) => EXIT_USAGE,
            CliError::Run(_) => EXIT_RUN_FAILED,
        }
    }
}
