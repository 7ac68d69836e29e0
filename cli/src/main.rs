use batchx_core::api::EXIT_USAGE;
use clap::error::ErrorKind;
use clap::Parser;

mod app;
mod commands;
mod error;
mod logging;

use commands::cli;

#[tokio::main]
async fn main() {
    let args = match cli::Args::try_parse() {
        Ok(args) => args,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) if e.kind() == ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => e.exit(),
        Err(e) => {
            eprintln!("batchx: {}", cli::usage_diagnostic(&e));
            std::process::exit(EXIT_USAGE);
        }
    };

    let code = match app::run_app(args).await {
        Ok(code) => code,
        Err(e) => {
            let code = e.exit_code();
            eprintln!("batchx: {:#}", anyhow::Error::from(e));
            code
        }
    };
    std::process::exit(code);
}
