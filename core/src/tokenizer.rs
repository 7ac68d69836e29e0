//! Splits an input stream into delimiter-separated tokens.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::config::Delimiter;

/// Lazy token reader over a buffered byte stream.
///
/// Each token is the bytes between two delimiters with the delimiter removed.
/// Adjacent delimiters yield empty tokens; trailing bytes without a final
/// delimiter still form a token. Bytes are decoded as UTF-8, lossily.
pub struct Tokenizer<R> {
    reader: R,
    delimiter: u8,
    buf: Vec<u8>,
    read: u64,
    done: bool,
    failed: Option<std::io::Error>,
}

impl<R> Tokenizer<R>
where
    R: AsyncBufRead + Unpin,
{
    pub fn new(reader: R, delimiter: Delimiter) -> Self {
        Self {
            reader,
            delimiter: delimiter.byte(),
            buf: Vec::with_capacity(256),
            read: 0,
            done: false,
            failed: None,
        }
    }

    /// Next token, `Ok(None)` at end of input.
    ///
    /// A read error ends the sequence. Bytes read before it are returned as
    /// a final token first, the error on the following call, then `Ok(None)`.
    pub async fn next_token(&mut self) -> std::io::Result<Option<String>> {
        if let Some(e) = self.failed.take() {
            return Err(e);
        }
        if self.done {
            return Ok(None);
        }

        self.buf.clear();
        let n = match self.reader.read_until(self.delimiter, &mut self.buf).await {
            Ok(n) => n,
            Err(e) => {
                self.done = true;
                if self.buf.is_empty() {
                    return Err(e);
                }
                self.failed = Some(e);
                self.read += 1;
                return Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()));
            }
        };
        if n == 0 {
            self.done = true;
            return Ok(None);
        }

        if self.buf.last() == Some(&self.delimiter) {
            self.buf.pop();
        } else {
            // unterminated tail, nothing can follow it
            self.done = true;
        }

        self.read += 1;
        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }

    /// Tokens returned so far.
    pub fn tokens_read(&self) -> u64 {
        self.read
    }
}

#[cfg(test)]
mod tests {
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use pretty_assertions::assert_eq;
    use tokio::io::{AsyncRead, BufReader, ReadBuf};

    use super::*;

    async fn collect(input: &[u8], delimiter: Delimiter) -> Vec<String> {
        let mut tokenizer = Tokenizer::new(input, delimiter);
        let mut out = Vec::new();
        while let Some(tok) = tokenizer.next_token().await.unwrap() {
            out.push(tok);
        }
        assert_eq!(tokenizer.tokens_read(), out.len() as u64);
        out
    }

    #[tokio::test]
    async fn newline_tokens_with_unterminated_tail() {
        let got = collect(b"file1.txt\nfile2.txt", Delimiter::Newline).await;
        assert_eq!(got, vec!["file1.txt", "file2.txt"]);
    }

    #[tokio::test]
    async fn trailing_delimiter_adds_no_empty_token() {
        let got = collect(b"a\nb\n", Delimiter::Newline).await;
        assert_eq!(got, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn adjacent_delimiters_keep_empty_tokens() {
        let got = collect(b"a\n\nb\n\n", Delimiter::Newline).await;
        assert_eq!(got, vec!["a", "", "b", ""]);
    }

    #[tokio::test]
    async fn nul_delimiter_keeps_newlines_inside_tokens() {
        let got = collect(b"one\ntwo\0three\0", Delimiter::Nul).await;
        assert_eq!(got, vec!["one\ntwo", "three"]);
    }

    #[tokio::test]
    async fn empty_input_yields_nothing() {
        assert!(collect(b"", Delimiter::Newline).await.is_empty());
    }

    #[tokio::test]
    async fn carriage_returns_are_not_stripped() {
        let got = collect(b"a\r\nb", Delimiter::Newline).await;
        assert_eq!(got, vec!["a\r", "b"]);
    }

    /// Hands out `data` once, then fails every read.
    struct FailingReader {
        data: Option<&'static [u8]>,
    }

    impl AsyncRead for FailingReader {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<std::io::Result<()>> {
            match self.data.take() {
                Some(data) => {
                    buf.put_slice(data);
                    Poll::Ready(Ok(()))
                }
                None => Poll::Ready(Err(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "pipe went away",
                ))),
            }
        }
    }

    #[tokio::test]
    async fn read_error_keeps_partial_token() {
        let reader = BufReader::new(FailingReader {
            data: Some(b"a\nb\npartial"),
        });
        let mut tokenizer = Tokenizer::new(reader, Delimiter::Newline);

        assert_eq!(tokenizer.next_token().await.unwrap().as_deref(), Some("a"));
        assert_eq!(tokenizer.next_token().await.unwrap().as_deref(), Some("b"));
        assert_eq!(
            tokenizer.next_token().await.unwrap().as_deref(),
            Some("partial")
        );
        let err = tokenizer.next_token().await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::BrokenPipe);
        assert_eq!(tokenizer.next_token().await.unwrap(), None);
        assert_eq!(tokenizer.tokens_read(), 3);
    }

    #[tokio::test]
    async fn read_error_after_delimiter_adds_no_token() {
        let reader = BufReader::new(FailingReader {
            data: Some(b"a\n"),
        });
        let mut tokenizer = Tokenizer::new(reader, Delimiter::Newline);

        assert_eq!(tokenizer.next_token().await.unwrap().as_deref(), Some("a"));
        assert!(tokenizer.next_token().await.is_err());
        assert_eq!(tokenizer.next_token().await.unwrap(), None);
        assert_eq!(tokenizer.tokens_read(), 1);
    }
}
