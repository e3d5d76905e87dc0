//! Cluster access through the CLI tool
//!
//! The cluster CLI is an external collaborator: this module only runs it
//! and reads the strings its JSONPath output produces.

mod command;
mod discovery;

#[cfg(test)]
pub use command::command_line;
pub use command::{CommandRunner, ProcessRunner};
pub use discovery::ResourceDiscovery;
