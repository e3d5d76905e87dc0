//! Output module
//!
//! Console and JSON reports plus the exit code decision.

mod formatter;

pub use formatter::{exit_code, OutputFormat, Reporter};
