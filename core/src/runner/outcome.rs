/// Result of one invocation, as handed to the output side.
///
/// A run either produced output or failed; the two never travel together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Captured standard output of a zero-status run.
    Success(String),
    /// Captured standard error, or a synthesized description when there was none.
    Failure(String),
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    pub fn text(&self) -> &str {
        match self {
            Outcome::Success(s) | Outcome::Failure(s) => s,
        }
    }
}
