// core/src/error/config_error.rs
use thiserror::Error;

/// Problems detected while building a run configuration.
///
/// All of these are fatal before any input is read or any command is spawned.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no command specified")]
    MissingCommand,

    #[error("{flag}: argument provided is invalid: {value:?}")]
    InvalidNumber { flag: &'static str, value: String },

    #[error("{flag}: argument is required but not provided")]
    MissingValue { flag: &'static str },

    #[error("config file not found: {0}")]
    NotFound(String),

    #[error("config parse error")]
    Parse(#[source] toml::de::Error),

    #[error("config file unreadable: {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("env var invalid: {key}")]
    EnvInvalid {
        key: String,
        #[source]
        source: std::num::ParseIntError,
    },
}
