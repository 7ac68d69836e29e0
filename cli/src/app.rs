use batchx_core::api::{self, AppConfig, ConfigError, Delimiter, RunConfig, RunMode};

use crate::commands::cli::Args;
use crate::error::CliError;
use crate::logging;

pub async fn run_app(args: Args) -> Result<i32, CliError> {
    let cfg = api::load(args.config.as_deref())?;
    let _log_guard = logging::init(&cfg.logging).map_err(CliError::Logging)?;

    let run_cfg = build_run_config(&args, &cfg)?;
    tracing::debug!(?run_cfg, "configuration resolved");

    let report = api::run_stdio(&run_cfg).await?;
    if let Some(err) = &report.input_error {
        tracing::warn!(error = %err, tokens = report.tokens_read, "input ended early");
    }
    Ok(report.exit_code())
}

/// Flags override file and environment values.
pub fn build_run_config(args: &Args, cfg: &AppConfig) -> Result<RunConfig, ConfigError> {
    let delimiter = if args.null {
        Delimiter::Nul
    } else {
        Delimiter::Newline
    };
    let mode = if args.exit_on_error || cfg.run.exit_on_error {
        RunMode::ExitOnError
    } else {
        RunMode::ContinueOnError
    };

    RunConfig::builder(args.command.iter().cloned())
        .delimiter(delimiter)
        .max_procs(args.max_procs.unwrap_or(cfg.run.max_procs))
        .max_args(args.max_args.unwrap_or(cfg.run.max_args))
        .replacement(args.replace.clone())
        .mode(mode)
        .build()
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pretty_assertions::assert_eq;

    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("batchx").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_come_from_file_config() {
        let mut cfg = AppConfig::default();
        cfg.run.max_procs = 8;
        cfg.run.max_args = 2;
        cfg.run.exit_on_error = true;

        let run = build_run_config(&args(&["echo"]), &cfg).unwrap();
        assert_eq!(run.max_procs(), 8);
        assert_eq!(run.max_args(), 2);
        assert_eq!(run.mode(), RunMode::ExitOnError);
        assert_eq!(run.delimiter(), Delimiter::Newline);
    }

    #[test]
    fn flags_override_file_config() {
        let mut cfg = AppConfig::default();
        cfg.run.max_procs = 8;

        let run = build_run_config(&args(&["-0", "-P", "2", "-n", "5", "echo"]), &cfg).unwrap();
        assert_eq!(run.max_procs(), 2);
        assert_eq!(run.max_args(), 5);
        assert_eq!(run.delimiter(), Delimiter::Nul);
        assert_eq!(run.mode(), RunMode::ContinueOnError);
    }

    #[test]
    fn replacement_forces_single_token() {
        let argv = args(&["-n", "4", "-I", "{}", "mv", "{}", "x"]);
        let run = build_run_config(&argv, &AppConfig::default()).unwrap();
        assert_eq!(run.max_args(), 1);
        assert_eq!(run.replacement(), Some("{}"));
        assert_eq!(run.command(), ["mv", "{}", "x"]);
    }

    #[test]
    fn zero_workers_is_a_usage_error() {
        let argv = args(&["-P", "0", "echo"]);
        let err = build_run_config(&argv, &AppConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { .. }));
        assert_eq!(CliError::from(err).exit_code(), api::EXIT_USAGE);
    }

    #[test]
    fn empty_replacement_is_rejected() {
        let err = build_run_config(&args(&["-I", "", "echo"]), &AppConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingValue { .. }));
    }
}
