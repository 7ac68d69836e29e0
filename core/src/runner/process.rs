use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::RunnerError;
use crate::invocation::Invocation;

use super::exit::{describe_status, normalize_exit};
use super::{InvocationRunner, Outcome};

/// Fully captured streams of a finished child.
#[derive(Debug, Clone)]
pub struct Captured {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

/// Runs invocations as child processes with an empty standard input.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }

    /// Spawns the child and waits for it, reading both pipes to the end.
    pub async fn capture(&self, invocation: &Invocation) -> Result<Captured, RunnerError> {
        let program = invocation.program().ok_or(RunnerError::EmptyInvocation)?;

        let child = Command::new(program)
            .args(invocation.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RunnerError::Spawn {
                program: program.to_string(),
                source,
            })?;

        let output = child
            .wait_with_output()
            .await
            .map_err(|source| RunnerError::Wait {
                program: program.to_string(),
                source,
            })?;

        Ok(Captured {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[async_trait]
impl InvocationRunner for ProcessRunner {
    fn name(&self) -> &str {
        "process"
    }

    async fn run(&self, invocation: &Invocation) -> Outcome {
        let program = invocation.program().unwrap_or_default();
        match self.capture(invocation).await {
            Ok(captured) if captured.status.success() => {
                if !captured.stderr.is_empty() {
                    tracing::debug!(
                        target: "batchx.runner",
                        program,
                        bytes = captured.stderr.len(),
                        "discarding stderr of successful command"
                    );
                }
                Outcome::Success(captured.stdout)
            }
            Ok(captured) => {
                tracing::debug!(
                    target: "batchx.runner",
                    program,
                    code = normalize_exit(captured.status),
                    "command failed"
                );
                if captured.stderr.is_empty() {
                    Outcome::Failure(describe_status(program, captured.status))
                } else {
                    Outcome::Failure(captured.stderr)
                }
            }
            Err(e) => {
                tracing::debug!(
                    target: "batchx.runner",
                    program,
                    error = %e,
                    "command did not run"
                );
                Outcome::Failure(spawn_description(&e))
            }
        }
    }
}

fn spawn_description(err: &RunnerError) -> String {
    match err {
        RunnerError::Spawn { program, source } | RunnerError::Wait { program, source } => {
            format!("{program}: {source}")
        }
        RunnerError::EmptyInvocation => err.to_string(),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn inv(argv: &[&str]) -> Invocation {
        Invocation::new(argv.iter().map(|s| s.to_string()).collect())
    }

    #[tokio::test]
    async fn success_captures_stdout() {
        let out = ProcessRunner::new()
            .run(&inv(&["sh", "-c", "printf 'hello\\n'; echo noise >&2"]))
            .await;
        assert_eq!(out, Outcome::Success("hello\n".into()));
    }

    #[tokio::test]
    async fn failure_prefers_stderr() {
        let out = ProcessRunner::new()
            .run(&inv(&["sh", "-c", "echo out; echo broken >&2; exit 4"]))
            .await;
        assert_eq!(out, Outcome::Failure("broken\n".into()));
    }

    #[tokio::test]
    async fn silent_failure_is_described() {
        let out = ProcessRunner::new().run(&inv(&["sh", "-c", "exit 7"])).await;
        assert_eq!(out, Outcome::Failure("sh: exited with status 7".into()));
    }

    #[tokio::test]
    async fn missing_program_is_a_failure() {
        let out = ProcessRunner::new()
            .run(&inv(&["batchx-definitely-not-installed"]))
            .await;
        assert!(out.is_failure());
        assert!(out.text().starts_with("batchx-definitely-not-installed: "));
    }

    #[tokio::test]
    async fn stdin_is_empty() {
        // `cat` would hang on an inherited terminal; with a null stdin it exits at once.
        let out = ProcessRunner::new().run(&inv(&["cat"])).await;
        assert_eq!(out, Outcome::Success(String::new()));
    }

    #[tokio::test]
    async fn empty_invocation_is_rejected() {
        let err = ProcessRunner::new().capture(&inv(&[])).await.unwrap_err();
        assert!(matches!(err, RunnerError::EmptyInvocation));
    }
}
