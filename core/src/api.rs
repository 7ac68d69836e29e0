//! Stable re-exports for consumers (`cli` and external crates).
//!
//! Prefer importing from `batchx_core::api` instead of reaching into internal modules.

pub use crate::batcher::{BatchPolicy, Batcher};
pub use crate::config::{
    apply_env_overrides, load, load_default, AppConfig, Delimiter, LoggingConfig, RunConfig,
    RunConfigBuilder, RunDefaults, RunMode, DEFAULT_CONFIG_FILE,
};
pub use crate::engine::{
    run_batch, run_stdio, RunReport, EXIT_RUN_FAILED, EXIT_SUCCESS, EXIT_USAGE,
};
pub use crate::error::{ConfigError, RunError, RunnerError};
pub use crate::invocation::Invocation;
pub use crate::output::OutputMux;
pub use crate::pool::{CancelFlag, MetricsSnapshot};
pub use crate::runner::{InvocationRunner, Outcome, ProcessRunner};
pub use crate::tokenizer::Tokenizer;
