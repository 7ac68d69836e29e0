mod feeder;
mod run;
mod types;

pub use feeder::FeedReport;
pub use run::{run_batch, run_stdio};
pub use types::{RunReport, EXIT_RUN_FAILED, EXIT_SUCCESS, EXIT_USAGE};
