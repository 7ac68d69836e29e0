use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const MAX_ARGS_FLAG: &str = "-n, --max-args";
pub const MAX_PROCS_FLAG: &str = "-P, --max-procs";
pub const REPLACE_FLAG: &str = "-I, -i";

/// Byte that separates tokens on the input stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Newline,
    Nul,
}

impl Delimiter {
    pub fn byte(self) -> u8 {
        match self {
            Delimiter::Newline => b'\n',
            Delimiter::Nul => b'\0',
        }
    }
}

/// What a failing invocation does to the rest of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Report the failure and keep dispatching.
    #[default]
    ContinueOnError,
    /// Report the failure, stop dispatching, let in-flight work drain.
    ExitOnError,
}

/// Everything a run needs, fixed before the first token is read.
///
/// Built through [`RunConfig::builder`]; there is no way to mutate it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    delimiter: Delimiter,
    max_procs: usize,
    max_args: usize,
    replacement: Option<String>,
    mode: RunMode,
    command: Vec<String>,
}

impl RunConfig {
    pub fn builder<I, S>(command: I) -> RunConfigBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RunConfigBuilder {
            delimiter: Delimiter::default(),
            max_procs: 1,
            max_args: 1,
            replacement: None,
            mode: RunMode::default(),
            command: command.into_iter().map(Into::into).collect(),
        }
    }

    pub fn delimiter(&self) -> Delimiter {
        self.delimiter
    }

    /// Number of workers, and therefore the most processes alive at once.
    pub fn max_procs(&self) -> usize {
        self.max_procs
    }

    /// Tokens per invocation. Always 1 when a replacement token is set.
    pub fn max_args(&self) -> usize {
        self.max_args
    }

    pub fn replacement(&self) -> Option<&str> {
        self.replacement.as_deref()
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    /// Program followed by its fixed leading arguments.
    pub fn command(&self) -> &[String] {
        &self.command
    }
}

#[derive(Debug, Clone)]
pub struct RunConfigBuilder {
    delimiter: Delimiter,
    max_procs: usize,
    max_args: usize,
    replacement: Option<String>,
    mode: RunMode,
    command: Vec<String>,
}

impl RunConfigBuilder {
    pub fn delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn max_procs(mut self, n: usize) -> Self {
        self.max_procs = n;
        self
    }

    pub fn max_args(mut self, n: usize) -> Self {
        self.max_args = n;
        self
    }

    pub fn replacement(mut self, token: Option<String>) -> Self {
        self.replacement = token;
        self
    }

    pub fn mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn build(self) -> Result<RunConfig, ConfigError> {
        if self.command.is_empty() {
            return Err(ConfigError::MissingCommand);
        }
        if self.max_procs < 1 {
            return Err(ConfigError::InvalidNumber {
                flag: MAX_PROCS_FLAG,
                value: self.max_procs.to_string(),
            });
        }
        if self.max_args < 1 {
            return Err(ConfigError::InvalidNumber {
                flag: MAX_ARGS_FLAG,
                value: self.max_args.to_string(),
            });
        }
        if matches!(self.replacement.as_deref(), Some("")) {
            return Err(ConfigError::MissingValue { flag: REPLACE_FLAG });
        }

        // A replacement token always means one token per invocation.
        let max_args = if self.replacement.is_some() {
            1
        } else {
            self.max_args
        };

        Ok(RunConfig {
            delimiter: self.delimiter,
            max_procs: self.max_procs,
            max_args,
            replacement: self.replacement,
            mode: self.mode,
            command: self.command,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub run: RunDefaults,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Defaults applied when the matching command-line flag is absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunDefaults {
    #[serde(default = "default_max_procs")]
    pub max_procs: usize,

    #[serde(default = "default_max_args")]
    pub max_args: usize,

    #[serde(default)]
    pub exit_on_error: bool,
}

fn default_max_procs() -> usize {
    1
}

fn default_max_args() -> usize {
    1
}

impl Default for RunDefaults {
    fn default() -> Self {
        Self {
            max_procs: default_max_procs(),
            max_args: default_max_args(),
            exit_on_error: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path. Empty means standard error.
    #[serde(default)]
    pub file: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: String::new(),
        }
    }
}
