mod config_error;
mod run_error;
mod runner_error;

pub use config_error::ConfigError;
pub use run_error::RunError;
pub use runner_error::RunnerError;
