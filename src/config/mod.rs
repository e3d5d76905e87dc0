//! Configuration module
//!
//! Holds the deployment coordinates the smoke run targets. The defaults are
//! the fixed Team2 names; a config file and `ROUTE_SMOKE_*` variables may
//! override them. The value is built once in `main` and passed by reference.

mod env;
mod file;

pub use env::EnvConfig;
pub use file::find_config_file;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default probe deadline in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Smoke test configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmokeConfig {
    /// Cluster CLI binary
    pub tool: String,

    /// Target namespace
    pub namespace: String,

    /// Route names
    pub routes: RouteNames,

    /// Edge workload (serves the frontend and proxies the API)
    pub gateway: Workload,

    /// API workload
    pub backend: Workload,

    /// Per-probe deadline in milliseconds
    pub timeout_ms: u64,

    /// Emit ANSI colours
    pub color: bool,
}

impl Default for SmokeConfig {
    fn default() -> Self {
        Self {
            tool: "kubectl".to_string(),
            namespace: "team2-demo".to_string(),
            routes: RouteNames::default(),
            gateway: Workload::new("gateway-team2"),
            backend: Workload::new("backend-team2"),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            color: true,
        }
    }
}

impl SmokeConfig {
    /// Load configuration from a YAML or JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if file::is_yaml_file(path) {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Resolve the effective configuration: file (explicit or discovered),
    /// then environment overrides
    pub fn resolve(explicit: Option<&Path>, env: &EnvConfig) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| env.config_file.as_ref().map(Into::into))
            .or_else(find_config_file);

        let mut config = match path {
            Some(path) => {
                tracing::debug!("Loading config from {}", path.display());
                Self::load(&path)?
            }
            None => Self::default(),
        };

        env.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the run cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.tool.trim().is_empty() {
            anyhow::bail!("Cluster tool must not be empty");
        }
        if self.namespace.trim().is_empty() {
            anyhow::bail!("Namespace must not be empty");
        }
        if self.routes.frontend.trim().is_empty() {
            anyhow::bail!("Frontend route name must not be empty");
        }
        if self.timeout_ms == 0 {
            anyhow::bail!("Probe timeout must be greater than zero");
        }
        Ok(())
    }

    /// Palette matching the colour setting
    pub fn palette(&self) -> Palette {
        if self.color {
            Palette::ansi()
        } else {
            Palette::plain()
        }
    }
}

/// Names of the three routes under test
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteNames {
    pub frontend: String,
    pub api: String,
    pub backend: String,
}

impl Default for RouteNames {
    fn default() -> Self {
        Self {
            frontend: "team2-frontend".to_string(),
            api: "team2-api".to_string(),
            backend: "team2-backend".to_string(),
        }
    }
}

/// A workload: its service, pod selector and deployment share one name
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workload {
    /// Service whose endpoints back this workload
    pub service: String,

    /// Pod label selector
    pub selector: String,

    /// Deployment name (used in troubleshooting hints)
    pub deployment: String,
}

impl Workload {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            selector: format!("app={name}"),
            service: name.clone(),
            deployment: name,
        }
    }
}

/// ANSI colour codes for console output
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub green: &'static str,
    pub red: &'static str,
    pub yellow: &'static str,
    pub reset: &'static str,
}

impl Palette {
    pub fn ansi() -> Self {
        Self {
            green: "\x1b[32m",
            red: "\x1b[31m",
            yellow: "\x1b[33m",
            reset: "\x1b[0m",
        }
    }

    pub fn plain() -> Self {
        Self {
            green: "",
            red: "",
            yellow: "",
            reset: "",
        }
    }

    pub fn ok(&self, msg: &str) -> String {
        format!("{}{msg}{}", self.green, self.reset)
    }

    pub fn warn(&self, msg: &str) -> String {
        format!("{}{msg}{}", self.yellow, self.reset)
    }

    pub fn err(&self, msg: &str) -> String {
        format!("{}{msg}{}", self.red, self.reset)
    }
}
