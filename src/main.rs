//! route-smoke - post-rollout smoke test for the Team2 demo deployment
//!
//! Resolves the deployed routes and service endpoints through the cluster
//! CLI, then runs an ordered list of HTTP and readiness checks against them.
//! A failing check never stops the run; the exit code is 1 when any check
//! failed or the cluster could not be inspected at all.
//!
//! ## Usage
//!
//! ```bash
//! # Run every check with coloured console output
//! route-smoke
//!
//! # Machine-readable report with a tighter probe deadline
//! route-smoke run --format json --timeout-ms 2000
//!
//! # Show the checks in execution order
//! route-smoke list
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use tracing::{debug, error};

mod cli;
mod config;
mod error;
mod executor;
#[cfg(test)]
mod fakes;
mod http;
mod k8s;
mod models;
mod output;
mod tests;
mod utils;

use cli::{Args, Command, RunArgs};
use config::{EnvConfig, SmokeConfig};
use executor::{SessionOutcome, SmokeSession, TestCase};
use http::HttpClient;
use k8s::ProcessRunner;
use output::{exit_code, OutputFormat, Reporter};
use utils::{init_logger, LogLevel};

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let env = EnvConfig::load();

    // ROUTE_SMOKE_LOG is either a bare level or a full filter directive
    let env_log = env.log.as_deref().filter(|_| !args.verbose);
    let level = match env_log.and_then(LogLevel::from_str) {
        Some(level) => level,
        None if args.verbose => LogLevel::Debug,
        None => LogLevel::Warn,
    };
    init_logger(level, env_log.filter(|d| LogLevel::from_str(d).is_none()));

    let code = match run(&args, &env).await {
        Ok(code) => code,
        Err(e) => {
            error!("Unexpected error: {e:#}");
            eprintln!("Unexpected error: {e:#}");
            1
        }
    };
    std::process::exit(code);
}

async fn run(args: &Args, env: &EnvConfig) -> Result<i32> {
    if env.has_any() {
        debug!("Applying ROUTE_SMOKE_* environment overrides");
    }
    let mut config = SmokeConfig::resolve(args.config.as_deref(), env)?;
    if args.no_color {
        config.color = false;
    }

    match args.command() {
        Command::Run(run_args) => run_checks(config, &run_args).await,
        Command::List => {
            list_checks();
            Ok(0)
        }
    }
}

async fn run_checks(mut config: SmokeConfig, run_args: &RunArgs) -> Result<i32> {
    if let Some(timeout_ms) = run_args.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
    config.validate()?;

    let format = OutputFormat::from_str(&run_args.format)
        .with_context(|| format!("Unknown output format: {}", run_args.format))?;
    let reporter = Reporter::new(&config, format);

    let commands = ProcessRunner::new();
    let probe = HttpClient::new()?;
    let session = SmokeSession::new(&config, &commands, &probe);

    report_session(&session, &reporter, &tests::all_checks(), &mut io::stdout())
        .await
        .context("Failed to write report")
}

/// Drive one session and write its report; returns the process exit code
async fn report_session(
    session: &SmokeSession<'_>,
    reporter: &Reporter<'_>,
    checks: &[TestCase],
    out: &mut impl Write,
) -> io::Result<i32> {
    let text = reporter.format() == OutputFormat::Text;
    if text {
        writeln!(out, "{}", reporter.header())?;
        out.flush()?;
    }

    let (routes, endpoints) = match session.discover().await {
        Ok(found) => found,
        Err(e) => {
            error!("{e}");
            writeln!(out, "{}", reporter.render_fatal(&e))?;
            return Ok(1);
        }
    };

    if text {
        writeln!(out, "{}\n", reporter.preflight_ok())?;
        writeln!(out, "{}", reporter.render_discovery(&routes, &endpoints))?;
        out.flush()?;
    }

    let summary = session.run(checks, &routes, &endpoints).await;
    let code = exit_code(&summary);
    let outcome = SessionOutcome {
        routes,
        endpoints,
        summary,
    };

    write!(out, "{}", reporter.render(&outcome))?;
    if !text {
        writeln!(out)?;
    }
    out.flush()?;

    Ok(code)
}

fn list_checks() {
    println!("Smoke checks (execution order):");
    for (i, case) in tests::all_checks().iter().enumerate() {
        println!("  {:2}. {}", i + 1, case.name);
    }
}
