//! Scripted collaborators for exercising the harness without a cluster

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::SmokeError;
use crate::http::{HttpProbe, HttpResponse, ProbeOptions};
use crate::k8s::{command_line, CommandRunner};

/// Answers command lines from a script; unscripted commands fail
#[derive(Default)]
pub struct ScriptedCommands {
    script: HashMap<String, Result<String, String>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedCommands {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ok(mut self, command: &str, stdout: &str) -> Self {
        self.script
            .insert(command.to_string(), Ok(stdout.to_string()));
        self
    }

    pub fn fail(mut self, command: &str, message: &str) -> Self {
        self.script
            .insert(command.to_string(), Err(message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for ScriptedCommands {
    async fn execute(&self, program: &str, args: &[&str]) -> Result<String, SmokeError> {
        let command = command_line(program, args);
        self.calls.lock().unwrap().push(command.clone());

        match self.script.get(&command) {
            Some(Ok(stdout)) => Ok(stdout.trim().to_string()),
            Some(Err(message)) => Err(SmokeError::Command {
                command,
                message: message.clone(),
            }),
            None => Err(SmokeError::Command {
                command,
                message: "NotFound".to_string(),
            }),
        }
    }
}

/// Answers `METHOD url` keys from a script; unscripted requests fail to connect
#[derive(Default)]
pub struct ScriptedProbe {
    script: HashMap<String, Result<HttpResponse, SmokeError>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, method: &str, url: &str, response: HttpResponse) -> Self {
        self.script.insert(format!("{method} {url}"), Ok(response));
        self
    }

    pub fn error(mut self, method: &str, url: &str, error: SmokeError) -> Self {
        self.script.insert(format!("{method} {url}"), Err(error));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpProbe for ScriptedProbe {
    async fn fetch(&self, url: &str, options: &ProbeOptions) -> Result<HttpResponse, SmokeError> {
        let key = format!("{} {}", options.method, url);
        self.calls.lock().unwrap().push(key.clone());

        match self.script.get(&key) {
            Some(result) => result.clone(),
            None => Err(SmokeError::Probe {
                url: url.to_string(),
                reason: "could not connect".to_string(),
            }),
        }
    }
}

const ROUTE: &str = "-n team2-demo -o jsonpath={.spec.host}";
const ENDPOINTS: &str = "-n team2-demo -o jsonpath={.subsets[*].addresses[*].ip}";
const READY: &str = "-o jsonpath={.items[0].status.containerStatuses[0].ready}";

/// Cluster answering every lookup of a healthy rollout
pub fn scripted_cluster(frontend: &str) -> ScriptedCommands {
    ScriptedCommands::new()
        .ok("kubectl cluster-info", "Kubernetes control plane is running")
        .ok("kubectl get namespace team2-demo", "team2-demo Active")
        .ok(&format!("kubectl get route team2-frontend {ROUTE}"), frontend)
        .ok(
            &format!("kubectl get route team2-api {ROUTE}"),
            "team2-api.example.com",
        )
        .ok(
            &format!("kubectl get route team2-backend {ROUTE}"),
            "team2-backend.example.com",
        )
        .ok(
            &format!("kubectl get endpoints gateway-team2 {ENDPOINTS}"),
            "10.128.0.10",
        )
        .ok(
            &format!("kubectl get endpoints backend-team2 {ENDPOINTS}"),
            "10.128.0.11",
        )
        .ok(
            &format!("kubectl get pods -n team2-demo -l app=backend-team2 {READY}"),
            "true",
        )
        .ok(
            &format!("kubectl get pods -n team2-demo -l app=gateway-team2 {READY}"),
            "true",
        )
}

/// Site passing all eleven checks
pub fn healthy_site() -> ScriptedProbe {
    let html = r#"<html><head><base href="/app1/"></head><body><script src="main.3f9a1c.js"></script></body></html>"#;
    let hello = HttpResponse::new(200).body(r#"{"message":"Hello from Spring Boot Backend"}"#);
    let front = "http://team2-frontend.example.com";

    ScriptedProbe::new()
        .respond("GET", &format!("{front}/"), HttpResponse::new(404))
        .respond(
            "GET",
            &format!("{front}/app1"),
            HttpResponse::new(301).header("location", "http://team2-frontend.example.com/app1/"),
        )
        .respond("GET", &format!("{front}/app1/"), HttpResponse::new(200).body(html))
        .respond(
            "GET",
            &format!("{front}/app1/main.3f9a1c.js"),
            HttpResponse::new(200).body("console.log(1)"),
        )
        .respond("GET", &format!("{front}/api/hello"), hello.clone())
        .respond("GET", "http://team2-api.example.com/api/hello", hello.clone())
        .respond("GET", "http://team2-backend.example.com/api/hello", hello)
        .respond(
            "HEAD",
            &format!("{front}/app1/"),
            HttpResponse::new(200)
                .header("x-frame-options", "SAMEORIGIN")
                .header("x-content-type-options", "nosniff"),
        )
        .respond("GET", &format!("{front}/nonexistent/path"), HttpResponse::new(404))
}
