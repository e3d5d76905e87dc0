//! Data models for the smoke run
//!
//! This module contains the discovered context and result structures.

mod cluster;
mod test_result;

pub use cluster::{describe_ips, EndpointSet, RouteSet};
pub use test_result::{RunSummary, TestResult, TestStatus};
