//! Test execution engine
//!
//! Sequential check execution and the pre-flight/discovery pipeline.

mod runner;
mod session;

#[cfg(test)]
pub use runner::CaseFn;
pub use runner::{ensure, CaseResult, TestCase, TestContext};
pub use session::{SessionOutcome, SmokeSession};
