use std::path::PathBuf;

use clap::Parser;

/// Build command lines from standard input and run them in parallel.
#[derive(Parser, Debug, Clone)]
#[command(version, arg_required_else_help = true)]
pub struct Args {
    /// Input tokens are terminated by NUL instead of newline.
    #[arg(short = '0', long = "null")]
    pub null: bool,

    /// Stop dispatching after the first failed command and exit non-zero.
    #[arg(long)]
    pub exit_on_error: bool,

    /// Tokens appended to each command line.
    #[arg(short = 'n', long, value_name = "N")]
    pub max_args: Option<usize>,

    /// Commands running at the same time.
    #[arg(short = 'P', long, value_name = "N")]
    pub max_procs: Option<usize>,

    /// Replace TOKEN in the command arguments with each input token.
    #[arg(short = 'I', short_alias = 'i', value_name = "TOKEN")]
    pub replace: Option<String>,

    /// Configuration file (default: ./batchx.toml when present).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Command to run, followed by its own arguments.
    #[arg(
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "COMMAND"
    )]
    pub command: Vec<String>,
}

/// First line of a clap error without its `error: ` prefix.
pub fn usage_diagnostic(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let line = rendered.lines().next().unwrap_or_default().trim();
    line.strip_prefix("error:").unwrap_or(line).trim().to_string()
}
