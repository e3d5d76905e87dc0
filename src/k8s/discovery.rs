//! Resource discovery
//!
//! Pre-flight checks and lookup of routes and service endpoints through the
//! cluster CLI.

use tracing::{info, warn};

use super::command::CommandRunner;
use crate::config::{SmokeConfig, Workload};
use crate::error::SmokeError;
use crate::models::{describe_ips, EndpointSet, RouteSet};

const HOST_JSONPATH: &str = "jsonpath={.spec.host}";
const ENDPOINT_JSONPATH: &str = "jsonpath={.subsets[*].addresses[*].ip}";
const READY_JSONPATH: &str = "jsonpath={.items[0].status.containerStatuses[0].ready}";

/// Resolves deployment resources for one namespace
pub struct ResourceDiscovery<'a> {
    runner: &'a dyn CommandRunner,
    config: &'a SmokeConfig,
}

impl<'a> ResourceDiscovery<'a> {
    pub fn new(runner: &'a dyn CommandRunner, config: &'a SmokeConfig) -> Self {
        Self { runner, config }
    }

    /// Verify the cluster answers and the namespace exists
    pub async fn preflight(&self) -> Result<(), SmokeError> {
        let tool = self.config.tool.as_str();

        self.runner
            .run(tool, &["cluster-info"], false)
            .await
            .map_err(|e| SmokeError::Preflight(format!("cluster unreachable: {e}")))?;

        self.runner
            .run(tool, &["get", "namespace", self.config.namespace.as_str()], false)
            .await
            .map_err(|e| {
                SmokeError::Preflight(format!(
                    "namespace {} not found: {e}",
                    self.config.namespace
                ))
            })?;

        info!("Pre-flight checks passed for namespace {}", self.config.namespace);
        Ok(())
    }

    /// Hostname of a route, `None` when it does not resolve
    async fn route_host(&self, name: &str) -> Result<Option<String>, SmokeError> {
        let host = self
            .runner
            .run(
                &self.config.tool,
                &[
                    "get",
                    "route",
                    name,
                    "-n",
                    self.config.namespace.as_str(),
                    "-o",
                    HOST_JSONPATH,
                ],
                true,
            )
            .await?;

        Ok(Some(host).filter(|h| !h.is_empty()))
    }

    /// Resolve the three routes; only a missing frontend route is fatal
    pub async fn discover_routes(&self) -> Result<RouteSet, SmokeError> {
        let names = &self.config.routes;

        let frontend = self
            .route_host(&names.frontend)
            .await?
            .ok_or_else(|| SmokeError::Discovery("routes not found; deploy first".to_string()))?;
        let api = self.route_host(&names.api).await?;
        let backend = self.route_host(&names.backend).await?;

        info!("Frontend route: http://{}", frontend);
        match &api {
            Some(host) => info!("API route: http://{}", host),
            None => warn!("API route {} not resolved", names.api),
        }
        match &backend {
            Some(host) => info!("Backend route: http://{}", host),
            None => warn!("Backend route {} not resolved", names.backend),
        }

        Ok(RouteSet {
            frontend_host: frontend,
            api_host: api,
            backend_host: backend,
        })
    }

    async fn endpoint_ips(&self, service: &str) -> Result<String, SmokeError> {
        self.runner
            .run(
                &self.config.tool,
                &[
                    "get",
                    "endpoints",
                    service,
                    "-n",
                    self.config.namespace.as_str(),
                    "-o",
                    ENDPOINT_JSONPATH,
                ],
                true,
            )
            .await
    }

    /// Resolve endpoint IPs for both services; never fatal
    pub async fn discover_endpoints(&self) -> Result<EndpointSet, SmokeError> {
        let gateway = self.endpoint_ips(&self.config.gateway.service).await?;
        let backend = self.endpoint_ips(&self.config.backend.service).await?;
        let endpoints = EndpointSet::from_lists(&gateway, &backend);

        info!(
            "Gateway endpoints: {} | Backend endpoints: {}",
            describe_ips(&endpoints.gateway_ips),
            describe_ips(&endpoints.backend_ips)
        );
        if !endpoints.is_complete() {
            warn!("Pods may not be ready yet");
        }

        Ok(endpoints)
    }

    /// Readiness flag of the first container of the first matching pod
    pub async fn pod_ready(&self, workload: &Workload) -> Result<String, SmokeError> {
        self.runner
            .run(
                &self.config.tool,
                &[
                    "get",
                    "pods",
                    "-n",
                    self.config.namespace.as_str(),
                    "-l",
                    workload.selector.as_str(),
                    "-o",
                    READY_JSONPATH,
                ],
                false,
            )
            .await
    }
}
