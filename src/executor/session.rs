//! Smoke session pipeline
//!
//! Pre-flight, then discovery, then the checks. Pre-flight and discovery
//! errors are fatal and no check runs after them.

use tracing::info;

use super::runner::{TestCase, TestContext, TestRunner};
use crate::config::SmokeConfig;
use crate::error::SmokeError;
use crate::http::HttpProbe;
use crate::k8s::{CommandRunner, ResourceDiscovery};
use crate::models::{EndpointSet, RouteSet, RunSummary};

/// Discovered context plus the results run against it
#[derive(Clone, Debug)]
pub struct SessionOutcome {
    pub routes: RouteSet,
    pub endpoints: EndpointSet,
    pub summary: RunSummary,
}

/// One smoke run against one namespace
pub struct SmokeSession<'a> {
    config: &'a SmokeConfig,
    commands: &'a dyn CommandRunner,
    probe: &'a dyn HttpProbe,
    runner: TestRunner,
}

impl<'a> SmokeSession<'a> {
    pub fn new(
        config: &'a SmokeConfig,
        commands: &'a dyn CommandRunner,
        probe: &'a dyn HttpProbe,
    ) -> Self {
        Self {
            config,
            commands,
            probe,
            runner: TestRunner::new(),
        }
    }

    /// Pre-flight and discovery
    pub async fn discover(&self) -> Result<(RouteSet, EndpointSet), SmokeError> {
        let discovery = ResourceDiscovery::new(self.commands, self.config);

        discovery.preflight().await?;
        let routes = discovery.discover_routes().await?;
        let endpoints = discovery.discover_endpoints().await?;
        info!("Discovery complete for {}", routes.frontend_host);

        Ok((routes, endpoints))
    }

    /// Run the checks against an already discovered context
    pub async fn run(
        &self,
        cases: &[TestCase],
        routes: &RouteSet,
        endpoints: &EndpointSet,
    ) -> RunSummary {
        let ctx = TestContext {
            routes,
            endpoints,
            config: self.config,
            probe: self.probe,
            commands: self.commands,
        };
        self.runner.run_all(cases, &ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{healthy_site, scripted_cluster, ScriptedCommands, ScriptedProbe};
    use crate::models::TestStatus;
    use crate::tests::all_checks;

    async fn execute(
        session: &SmokeSession<'_>,
        cases: &[TestCase],
    ) -> Result<SessionOutcome, SmokeError> {
        let (routes, endpoints) = session.discover().await?;
        let summary = session.run(cases, &routes, &endpoints).await;
        Ok(SessionOutcome {
            routes,
            endpoints,
            summary,
        })
    }

    #[tokio::test]
    async fn test_healthy_deployment_passes_every_check() {
        let config = SmokeConfig::default();
        let commands = scripted_cluster("team2-frontend.example.com");
        let probe = healthy_site();

        let outcome = execute(&SmokeSession::new(&config, &commands, &probe), &all_checks())
            .await
            .unwrap();

        let failures: Vec<_> = outcome
            .summary
            .results
            .iter()
            .filter(|r| r.status == TestStatus::Fail)
            .collect();
        assert!(failures.is_empty(), "unexpected failures: {failures:?}");
        assert_eq!(outcome.summary.total(), 11);
        assert_eq!(outcome.endpoints.gateway_ips.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_frontend_route_runs_nothing() {
        let config = SmokeConfig::default();
        let commands = scripted_cluster("");
        let probe = healthy_site();

        let err = execute(&SmokeSession::new(&config, &commands, &probe), &all_checks())
            .await
            .unwrap_err();

        assert!(matches!(err, SmokeError::Discovery(_)));
        assert!(probe.calls().is_empty());
        assert!(!commands.calls().iter().any(|c| c.contains("get pods")));
    }

    #[tokio::test]
    async fn test_failed_preflight_skips_discovery() {
        let config = SmokeConfig::default();
        let commands = ScriptedCommands::new().fail("kubectl cluster-info", "connection refused");
        let probe = healthy_site();

        let err = execute(&SmokeSession::new(&config, &commands, &probe), &all_checks())
            .await
            .unwrap_err();

        assert!(matches!(err, SmokeError::Preflight(_)));
        assert_eq!(commands.calls().len(), 1);
        assert!(probe.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_site_still_runs_every_check() {
        let config = SmokeConfig::default();
        let commands = scripted_cluster("team2-frontend.example.com");
        let probe = ScriptedProbe::new();

        let outcome = execute(&SmokeSession::new(&config, &commands, &probe), &all_checks())
            .await
            .unwrap();

        let reported: Vec<_> = outcome.summary.results.iter().map(|r| r.name.as_str()).collect();
        let declared: Vec<_> = all_checks().iter().map(|c| c.name).collect();
        assert_eq!(reported, declared);
        // only the pod readiness check does not go through HTTP
        assert_eq!(outcome.summary.failure_count, 10);
        assert_eq!(
            outcome.summary.results.last().map(|r| r.status),
            Some(TestStatus::Pass)
        );
    }
}
