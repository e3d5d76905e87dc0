//! Environment variable configuration
//!
//! Provides `ROUTE_SMOKE_*` overrides for the smoke configuration.

use std::env;

use super::SmokeConfig;

/// Environment variable prefix
const ENV_PREFIX: &str = "ROUTE_SMOKE";

/// Overrides read from the environment
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnvConfig {
    /// Namespace from ROUTE_SMOKE_NAMESPACE
    pub namespace: Option<String>,
    /// Cluster CLI from ROUTE_SMOKE_TOOL
    pub tool: Option<String>,
    /// Probe deadline from ROUTE_SMOKE_TIMEOUT_MS
    pub timeout_ms: Option<u64>,
    /// Colour switch from ROUTE_SMOKE_NO_COLOR
    pub no_color: Option<bool>,
    /// Config file from ROUTE_SMOKE_CONFIG
    pub config_file: Option<String>,
    /// Log filter from ROUTE_SMOKE_LOG
    pub log: Option<String>,
}

impl EnvConfig {
    /// Load configuration from process environment variables
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(&format!("{ENV_PREFIX}_{name}"));

        Self {
            namespace: get("NAMESPACE"),
            tool: get("TOOL"),
            timeout_ms: get("TIMEOUT_MS").and_then(|v| v.parse().ok()),
            no_color: get("NO_COLOR").map(|v| parse_bool(&v)),
            config_file: get("CONFIG"),
            log: get("LOG"),
        }
    }

    /// Check if any override is set
    pub fn has_any(&self) -> bool {
        self.namespace.is_some()
            || self.tool.is_some()
            || self.timeout_ms.is_some()
            || self.no_color.is_some()
            || self.config_file.is_some()
    }

    /// Apply overrides on top of a loaded configuration
    pub fn apply(&self, config: &mut SmokeConfig) {
        if let Some(namespace) = &self.namespace {
            config.namespace = namespace.clone();
        }
        if let Some(tool) = &self.tool {
            config.tool = tool.clone();
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
        if let Some(no_color) = self.no_color {
            config.color = !no_color;
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.to_lowercase().as_str(),
        "1" | "true" | "yes" | "on" | "enabled"
    )
}
