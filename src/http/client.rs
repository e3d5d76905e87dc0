//! HTTP probe for deployment smoke tests
//!
//! Each probe owns its own [`Deadline`]; the request is dropped (and so
//! aborted) when the deadline fires first.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client, Method};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use crate::config::DEFAULT_TIMEOUT_MS;
use crate::error::SmokeError;
use crate::utils::{Deadline, Timer};

/// Redirect handling for a probe
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RedirectPolicy {
    #[default]
    Follow,
    /// Return the 3xx response with its `location` header untouched
    Manual,
}

/// Request options for a single probe
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeOptions {
    pub method: Method,
    pub redirect: RedirectPolicy,
    pub timeout_ms: u64,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            redirect: RedirectPolicy::Follow,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ProbeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn head(self) -> Self {
        self.method(Method::HEAD)
    }

    pub fn manual_redirect(mut self) -> Self {
        self.redirect = RedirectPolicy::Manual;
        self
    }

    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// HTTP response
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HttpResponse {
    pub status_code: u16,
    /// Header names are lowercase
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl HttpResponse {
    pub fn get_header(&self, name: &str) -> Option<&String> {
        self.headers.get(&name.to_lowercase())
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.get_header(name).is_some()
    }

    pub fn body_contains(&self, text: &str) -> bool {
        self.body.contains(text)
    }
}

#[cfg(test)]
impl HttpResponse {
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            ..Default::default()
        }
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_lowercase(), value.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}

/// Issues bounded HTTP requests
#[async_trait]
pub trait HttpProbe: Send + Sync {
    async fn fetch(&self, url: &str, options: &ProbeOptions) -> Result<HttpResponse, SmokeError>;
}

/// reqwest-backed probe
///
/// reqwest fixes the redirect policy per client, so one client is kept for
/// each policy.
#[derive(Clone)]
pub struct HttpClient {
    follow: Client,
    manual: Client,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self> {
        let follow = Client::builder()
            .redirect(Policy::limited(10))
            .danger_accept_invalid_certs(true)
            .no_proxy()
            .build()
            .context("Failed to create HTTP client")?;

        let manual = Client::builder()
            .redirect(Policy::none())
            .danger_accept_invalid_certs(true)
            .no_proxy()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { follow, manual })
    }

    fn client(&self, policy: RedirectPolicy) -> &Client {
        match policy {
            RedirectPolicy::Follow => &self.follow,
            RedirectPolicy::Manual => &self.manual,
        }
    }

    async fn exchange(
        &self,
        url: &str,
        options: &ProbeOptions,
    ) -> Result<HttpResponse, SmokeError> {
        let timer = Timer::start(format!("{} {}", options.method, url));

        let response = self
            .client(options.redirect)
            .request(options.method.clone(), url)
            .send()
            .await
            .map_err(|e| probe_error(url, options.timeout_ms, e))?;

        let status = response.status();
        // obs-text bytes are replaced, never dropped
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| {
                let value = String::from_utf8_lossy(v.as_bytes()).into_owned();
                (k.as_str().to_string(), value)
            })
            .collect();

        let body = if options.method == Method::HEAD {
            String::new()
        } else {
            response
                .text()
                .await
                .map_err(|e| probe_error(url, options.timeout_ms, e))?
        };

        debug!(
            "Response: {} {} from {} in {}ms",
            status.as_u16(),
            status.canonical_reason().unwrap_or(""),
            url,
            timer.stop()
        );

        Ok(HttpResponse {
            status_code: status.as_u16(),
            headers,
            body,
        })
    }
}

#[async_trait]
impl HttpProbe for HttpClient {
    async fn fetch(&self, url: &str, options: &ProbeOptions) -> Result<HttpResponse, SmokeError> {
        debug!("Sending {} request to {}", options.method, url);
        let deadline = Deadline::start(Duration::from_millis(options.timeout_ms));

        tokio::select! {
            biased;
            _ = deadline.expired() => Err(SmokeError::ProbeTimeout {
                url: url.to_string(),
                timeout_ms: deadline.timeout_ms(),
            }),
            result = self.exchange(url, options) => result,
        }
    }
}

fn probe_error(url: &str, timeout_ms: u64, e: reqwest::Error) -> SmokeError {
    if e.is_timeout() {
        SmokeError::ProbeTimeout {
            url: url.to_string(),
            timeout_ms,
        }
    } else if e.is_connect() {
        SmokeError::Probe {
            url: url.to_string(),
            reason: "could not connect".to_string(),
        }
    } else {
        SmokeError::Probe {
            url: url.to_string(),
            reason: e.to_string(),
        }
    }
}
