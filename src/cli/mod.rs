//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Post-rollout smoke test for the Team2 demo routes
#[derive(Parser, Debug)]
#[command(name = "route-smoke")]
#[command(version = "0.1.0")]
#[command(about = "Verify routes, redirects, assets, API reachability and pod readiness")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable ANSI colours
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Config file (YAML or JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// `run` with its defaults when no subcommand is given
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run(RunArgs::default()))
    }
}

#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Run the smoke checks (default)
    Run(RunArgs),

    /// List the checks in execution order
    List,
}

/// Arguments for run command
#[derive(Parser, Clone, Debug, PartialEq, Eq)]
pub struct RunArgs {
    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,

    /// Per-probe timeout in milliseconds
    #[arg(short, long)]
    pub timeout_ms: Option<u64>,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
            timeout_ms: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_is_default() {
        let args = Args::try_parse_from(["route-smoke"]).unwrap();
        assert_eq!(args.command(), Command::Run(RunArgs::default()));
        assert!(!args.verbose);
    }

    #[test]
    fn test_run_flags() {
        let args = Args::try_parse_from([
            "route-smoke",
            "run",
            "--format",
            "json",
            "--timeout-ms",
            "250",
            "--no-color",
        ])
        .unwrap();

        assert!(args.no_color);
        assert_eq!(
            args.command(),
            Command::Run(RunArgs {
                format: "json".to_string(),
                timeout_ms: Some(250),
            })
        );
    }

    #[test]
    fn test_list_with_global_flags() {
        let args =
            Args::try_parse_from(["route-smoke", "list", "-v", "--config", "smoke.yaml"]).unwrap();
        assert_eq!(args.command(), Command::List);
        assert!(args.verbose);
        assert_eq!(args.config, Some(PathBuf::from("smoke.yaml")));
    }

    #[test]
    fn test_rejects_unknown_subcommand() {
        assert!(Args::try_parse_from(["route-smoke", "deploy"]).is_err());
    }
}
