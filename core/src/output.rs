//! Writes outcomes to the two output streams.

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::runner::Outcome;

/// Serializes outcomes from all workers onto one stdout/stderr pair.
///
/// Each outcome is a single buffered write followed by a flush, so the bytes
/// of two outcomes never interleave.
pub struct OutputMux<O, E> {
    stdout: O,
    stderr: E,
}

impl OutputMux<tokio::io::Stdout, tokio::io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(tokio::io::stdout(), tokio::io::stderr())
    }
}

impl<O, E> OutputMux<O, E>
where
    O: AsyncWrite + Unpin,
    E: AsyncWrite + Unpin,
{
    pub fn new(stdout: O, stderr: E) -> Self {
        Self { stdout, stderr }
    }

    pub async fn write(&mut self, outcome: &Outcome) -> std::io::Result<()> {
        let block = normalize_block(outcome.text());
        match outcome {
            Outcome::Success(_) => {
                self.stdout.write_all(block.as_bytes()).await?;
                self.stdout.flush().await
            }
            Outcome::Failure(_) => {
                self.stderr.write_all(block.as_bytes()).await?;
                self.stderr.flush().await
            }
        }
    }

    pub fn into_inner(self) -> (O, E) {
        (self.stdout, self.stderr)
    }
}

/// Trims one trailing newline and adds exactly one back, so empty text
/// still produces an empty line.
pub fn normalize_block(text: &str) -> String {
    let body = text.strip_suffix('\n').unwrap_or(text);
    let mut block = String::with_capacity(body.len() + 1);
    block.push_str(body);
    block.push('\n');
    block
}
