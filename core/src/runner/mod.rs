pub mod exit;
mod outcome;
mod process;
mod traits;

pub use outcome::Outcome;
pub use process::{Captured, ProcessRunner};
pub use traits::InvocationRunner;
