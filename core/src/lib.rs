pub mod api;
pub mod batcher;
pub mod config;
pub mod engine;
pub mod error;
pub mod invocation;
pub mod output;
pub mod pool;
pub mod runner;
pub mod tokenizer;

pub use engine::{run_batch, run_stdio, RunReport};
