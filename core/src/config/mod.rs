//! Run configuration.
//!
//! - `types.rs`: the immutable [`RunConfig`] plus file-level defaults
//! - `load.rs`: IO (config file discovery + env overrides)

mod load;
mod types;

pub use load::{apply_env_overrides, load, load_default, DEFAULT_CONFIG_FILE};
pub use types::{
    AppConfig, Delimiter, LoggingConfig, RunConfig, RunConfigBuilder, RunDefaults, RunMode,
};
