//! Discovered cluster context
//!
//! Built once per run by discovery and shared read-only with every check.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Resolved route hostnames
///
/// The frontend host is always present: discovery refuses to build a
/// `RouteSet` without it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSet {
    pub frontend_host: String,
    pub api_host: Option<String>,
    pub backend_host: Option<String>,
}

impl RouteSet {
    /// `http://<frontend><path>`
    pub fn frontend_url(&self, path: &str) -> String {
        format!("http://{}{path}", self.frontend_host)
    }
}

#[cfg(test)]
impl RouteSet {
    pub fn new(frontend_host: impl Into<String>) -> Self {
        Self {
            frontend_host: frontend_host.into(),
            api_host: None,
            backend_host: None,
        }
    }

    pub fn with_api(mut self, host: impl Into<String>) -> Self {
        self.api_host = Some(host.into());
        self
    }
}

/// Pod IPs currently backing each service
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointSet {
    pub gateway_ips: BTreeSet<String>,
    pub backend_ips: BTreeSet<String>,
}

impl EndpointSet {
    /// Parse the whitespace-separated IP lists the cluster CLI prints
    pub fn from_lists(gateway: &str, backend: &str) -> Self {
        Self {
            gateway_ips: parse_ips(gateway),
            backend_ips: parse_ips(backend),
        }
    }

    /// Both services have at least one ready address
    pub fn is_complete(&self) -> bool {
        !self.gateway_ips.is_empty() && !self.backend_ips.is_empty()
    }
}

fn parse_ips(list: &str) -> BTreeSet<String> {
    list.split_whitespace().map(str::to_string).collect()
}

/// Render an IP set the way the console block shows it
pub fn describe_ips(ips: &BTreeSet<String>) -> String {
    if ips.is_empty() {
        "none".to_string()
    } else {
        ips.iter().cloned().collect::<Vec<_>>().join(" ")
    }
}
