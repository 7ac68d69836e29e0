use async_trait::async_trait;

use crate::invocation::Invocation;

use super::Outcome;

/// Executes one invocation to completion.
///
/// Implementations never fail outright: spawn problems and non-zero exits are
/// reported as [`Outcome::Failure`].
#[async_trait]
pub trait InvocationRunner: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self, invocation: &Invocation) -> Outcome;
}
