//! Console and JSON rendering of a smoke run
//!
//! Every render method returns a `String`; `main` decides where it goes.

use chrono::Utc;
use serde::Serialize;
use std::fmt::Write;

use crate::config::{Palette, SmokeConfig};
use crate::error::SmokeError;
use crate::executor::SessionOutcome;
use crate::models::{describe_ips, EndpointSet, RouteSet, RunSummary, TestResult, TestStatus};

const RULE: &str = "==============================";

/// Output format options
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "console" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Exit code for a completed run
pub fn exit_code(summary: &RunSummary) -> i32 {
    if summary.is_all_passed() {
        0
    } else {
        1
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    namespace: &'a str,
    routes: &'a RouteSet,
    endpoints: &'a EndpointSet,
    total: usize,
    passed: usize,
    failure_count: usize,
    total_duration_ms: u64,
    exit_code: i32,
    results: &'a [TestResult],
}

#[derive(Serialize)]
struct JsonFatal<'a> {
    generated_at: String,
    namespace: &'a str,
    error: String,
    kind: &'static str,
    exit_code: i32,
}

/// Renders smoke run output
pub struct Reporter<'a> {
    config: &'a SmokeConfig,
    palette: Palette,
    format: OutputFormat,
}

impl<'a> Reporter<'a> {
    pub fn new(config: &'a SmokeConfig, format: OutputFormat) -> Self {
        Self {
            config,
            palette: config.palette(),
            format,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn header(&self) -> String {
        format!("🧪 Testing Team2 Demo Routes\n{RULE}\n")
    }

    pub fn preflight_ok(&self) -> String {
        format!("🔍 Pre-flight checks... {}", self.palette.ok("OK"))
    }

    /// Routes and endpoint block printed before the checks
    pub fn render_discovery(&self, routes: &RouteSet, endpoints: &EndpointSet) -> String {
        let or_none = |host: &Option<String>| host.as_deref().unwrap_or("none").to_string();

        let mut out = String::new();
        let _ = writeln!(out, "📍 Routes:");
        let _ = writeln!(out, "  Frontend: http://{}", routes.frontend_host);
        let _ = writeln!(out, "  API:      http://{}", or_none(&routes.api_host));
        let _ = writeln!(out, "  Backend:  http://{}", or_none(&routes.backend_host));
        let _ = writeln!(out);
        let _ = writeln!(out, "🔍 Service Endpoints:");
        let _ = writeln!(out, "  Gateway endpoints: {}", describe_ips(&endpoints.gateway_ips));
        let _ = writeln!(out, "  Backend endpoints: {}", describe_ips(&endpoints.backend_ips));
        if !endpoints.is_complete() {
            let _ = writeln!(out, "{}", self.palette.warn("  Pods may not be ready yet"));
        }
        out
    }

    pub fn render_result(&self, result: &TestResult) -> String {
        let mut line = format!("• {} ... ", result.name);
        match result.status {
            TestStatus::Pass => line.push_str(&self.palette.ok("PASS")),
            TestStatus::Fail => {
                line.push_str(&self.palette.err("FAIL"));
                if let Some(message) = &result.message {
                    let _ = write!(line, "\n  {message}");
                }
            }
        }
        line
    }

    /// Summary, then access URLs or troubleshooting hints
    pub fn render_summary(&self, summary: &RunSummary, routes: &RouteSet) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "\n{RULE}");
        let _ = writeln!(
            out,
            "Total: {} | Passed: {} | Failed: {} | {}ms",
            summary.total(),
            summary.passed(),
            summary.failure_count,
            summary.total_duration_ms
        );

        if summary.is_all_passed() {
            let _ = writeln!(out, "{}", self.palette.ok("✓ All critical tests passed!"));
            let _ = writeln!(out, "\n🌐 Access the application:");
            let _ = writeln!(out, "   Frontend: {}", routes.frontend_url("/app1"));
            let _ = writeln!(out, "   API:      {}", routes.frontend_url("/api/hello"));
        } else {
            let failed = format!("✗ {} test(s) failed", summary.failure_count);
            let _ = writeln!(out, "{}", self.palette.err(&failed));
            let _ = writeln!(out, "\n🔍 Troubleshooting:");
            for hint in self.troubleshooting() {
                let _ = writeln!(out, "   {hint}");
            }
        }
        out
    }

    fn troubleshooting(&self) -> Vec<String> {
        let SmokeConfig {
            tool,
            namespace,
            gateway,
            backend,
            ..
        } = self.config;

        vec![
            format!("{tool} get pods -n {namespace}"),
            format!("{tool} logs -n {namespace} deployment/{}", gateway.deployment),
            format!("{tool} logs -n {namespace} deployment/{}", backend.deployment),
        ]
    }

    /// Rendering of a completed run; in text mode the discovery block has
    /// already been printed
    pub fn render(&self, outcome: &SessionOutcome) -> String {
        match self.format {
            OutputFormat::Text => {
                let mut out = String::new();
                for result in &outcome.summary.results {
                    out.push_str(&self.render_result(result));
                    out.push('\n');
                }
                out.push_str(&self.render_summary(&outcome.summary, &outcome.routes));
                out
            }
            OutputFormat::Json => self.render_json(outcome),
        }
    }

    fn render_json(&self, outcome: &SessionOutcome) -> String {
        let summary = &outcome.summary;
        let report = JsonReport {
            generated_at: Utc::now().to_rfc3339(),
            namespace: &self.config.namespace,
            routes: &outcome.routes,
            endpoints: &outcome.endpoints,
            total: summary.total(),
            passed: summary.passed(),
            failure_count: summary.failure_count,
            total_duration_ms: summary.total_duration_ms,
            exit_code: exit_code(summary),
            results: &summary.results,
        };
        serde_json::to_string_pretty(&report).unwrap_or_default()
    }

    /// Error that stopped the run before any check; always exit code 1
    pub fn render_fatal(&self, error: &SmokeError) -> String {
        match self.format {
            OutputFormat::Text if error.is_fatal() => self.palette.err(&error.to_string()),
            OutputFormat::Text => self.palette.err(&format!("Unexpected error: {error}")),
            OutputFormat::Json => {
                let report = JsonFatal {
                    generated_at: Utc::now().to_rfc3339(),
                    namespace: &self.config.namespace,
                    error: error.to_string(),
                    kind: error.kind(),
                    exit_code: 1,
                };
                serde_json::to_string_pretty(&report).unwrap_or_default()
            }
        }
    }
}
