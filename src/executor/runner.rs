//! Test execution runner
//!
//! Runs declared checks one at a time, in order, against a shared read-only
//! context. A failing check is recorded and the run moves on.

use futures::future::BoxFuture;
use futures::FutureExt;
use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use tracing::{debug, info, warn};

use crate::config::SmokeConfig;
use crate::error::SmokeError;
use crate::http::{HttpProbe, HttpResponse, ProbeOptions};
use crate::k8s::{CommandRunner, ResourceDiscovery};
use crate::models::{EndpointSet, RouteSet, RunSummary, TestResult};
use crate::utils::Timer;

/// Outcome of a check body
pub type CaseResult = Result<(), SmokeError>;

/// Check body: receives the context explicitly rather than capturing it
pub type CaseFn = for<'a> fn(&'a TestContext<'a>) -> BoxFuture<'a, CaseResult>;

/// A named check
#[derive(Clone, Copy)]
pub struct TestCase {
    pub name: &'static str,
    pub action: CaseFn,
}

impl TestCase {
    pub const fn new(name: &'static str, action: CaseFn) -> Self {
        Self { name, action }
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase").field("name", &self.name).finish()
    }
}

/// Everything a check may read or call; immutable for the whole run
#[derive(Clone, Copy)]
pub struct TestContext<'a> {
    pub routes: &'a RouteSet,
    pub endpoints: &'a EndpointSet,
    pub config: &'a SmokeConfig,
    pub probe: &'a dyn HttpProbe,
    pub commands: &'a dyn CommandRunner,
}

impl<'a> TestContext<'a> {
    /// Probe options carrying the configured deadline
    pub fn options(&self) -> ProbeOptions {
        ProbeOptions::new().timeout_ms(self.config.timeout_ms)
    }

    pub async fn fetch(
        &self,
        url: &str,
        options: ProbeOptions,
    ) -> Result<HttpResponse, SmokeError> {
        self.probe.fetch(url, &options).await
    }

    pub fn discovery(&self) -> ResourceDiscovery<'a> {
        ResourceDiscovery::new(self.commands, self.config)
    }
}

/// Fail the current check with `message` unless `condition` holds
pub fn ensure(condition: bool, message: impl Into<String>) -> CaseResult {
    if condition {
        Ok(())
    } else {
        Err(SmokeError::Assertion(message.into()))
    }
}

/// Sequential runner with per-check failure isolation
#[derive(Clone, Copy, Debug, Default)]
pub struct TestRunner;

impl TestRunner {
    pub fn new() -> Self {
        Self
    }

    /// Run a single check; never fails, the outcome is in the result
    pub async fn run_test(&self, case: &TestCase, ctx: &TestContext<'_>) -> TestResult {
        debug!("Running {}", case.name);
        let timer = Timer::start(case.name);

        let outcome = AssertUnwindSafe((case.action)(ctx)).catch_unwind().await;
        let duration_ms = timer.stop();

        match outcome {
            Ok(Ok(())) => {
                info!("{} passed in {}ms", case.name, duration_ms);
                TestResult::pass(case.name, duration_ms)
            }
            Ok(Err(e)) => {
                warn!("{} failed ({}): {}", case.name, e.kind(), e);
                TestResult::fail(case.name, duration_ms, e.to_string())
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!("{} panicked: {}", case.name, message);
                TestResult::fail(case.name, duration_ms, message)
            }
        }
    }

    /// Run every check in declaration order
    pub async fn run_all(&self, cases: &[TestCase], ctx: &TestContext<'_>) -> RunSummary {
        info!("Running {} checks", cases.len());

        let mut results = Vec::with_capacity(cases.len());
        for case in cases {
            results.push(self.run_test(case, ctx).await);
        }

        let summary = RunSummary::new(results);
        info!(
            "Run completed in {}ms - {} passed, {} failed",
            summary.total_duration_ms,
            summary.passed(),
            summary.failure_count
        );
        summary
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}
