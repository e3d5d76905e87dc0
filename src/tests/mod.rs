//! Deployment checks
//!
//! The declared order is significant and is the order of the report:
//!
//! ### Frontend routing
//! 1. Root returns 404 (no default redirect)
//! 2. Frontend accessible at /app1
//! 3. Redirect does not expose internal port
//! 4. Frontend HTML has base href
//! 5. Frontend static assets load
//!
//! ### API reachability
//! 6. API via frontend route
//! 7. API via API route
//! 8. API via backend route
//!
//! ### Hardening and workloads
//! 9. Security headers present on frontend
//! 10. Unknown paths return 404
//! 11. Pods are ready


use futures::FutureExt;

use crate::executor::TestCase;

/// All checks in declaration order
pub fn all_checks() -> Vec<TestCase> {
    vec![
        TestCase::new("Root returns 404 (no default redirect)", |ctx| {
            frontend::root_returns_404(ctx).boxed()
        }),
        TestCase::new("Frontend accessible at /app1", |ctx| {
            frontend::app_accessible(ctx).boxed()
        }),
        TestCase::new("Redirect does not expose internal port", |ctx| {
            frontend::redirect_hides_internal_port(ctx).boxed()
        }),
        TestCase::new("Frontend HTML has base href", |ctx| {
            frontend::html_has_base_href(ctx).boxed()
        }),
        TestCase::new("Frontend static assets load", |ctx| {
            frontend::static_assets_load(ctx).boxed()
        }),
        TestCase::new("API via frontend route", |ctx| {
            api::via_frontend_route(ctx).boxed()
        }),
        TestCase::new("API via API route", |ctx| api::via_api_route(ctx).boxed()),
        TestCase::new("API via backend route", |ctx| {
            api::via_backend_route(ctx).boxed()
        }),
        TestCase::new("Security headers present on frontend", |ctx| {
            frontend::security_headers_present(ctx).boxed()
        }),
        TestCase::new("Unknown paths return 404", |ctx| {
            frontend::unknown_path_returns_404(ctx).boxed()
        }),
        TestCase::new("Pods are ready", |ctx| infra::pods_ready(ctx).boxed()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_checks_in_declared_order() {
        let names: Vec<_> = all_checks().iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            [
                "Root returns 404 (no default redirect)",
                "Frontend accessible at /app1",
                "Redirect does not expose internal port",
                "Frontend HTML has base href",
                "Frontend static assets load",
                "API via frontend route",
                "API via API route",
                "API via backend route",
                "Security headers present on frontend",
                "Unknown paths return 404",
                "Pods are ready",
            ]
        );
    }

    #[test]
    fn test_names_unique() {
        let checks = all_checks();
        let mut names: Vec<_> = checks.iter().map(|c| c.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), checks.len());
    }
}
