//! Logging utilities
//!
//! Provides logging configuration and helpers.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Log level configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn to_tracing_level(self) -> Level {
        match self {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

/// Build the filter directive, preferring an explicit override
fn filter_directive(level: LogLevel, directive: Option<&str>) -> String {
    match directive {
        Some(d) if !d.trim().is_empty() => d.to_string(),
        _ => format!("route_smoke={}", level.to_tracing_level()),
    }
}

/// Initialize the logger; output goes to stderr so the report owns stdout
pub fn init_logger(level: LogLevel, directive: Option<&str>) {
    let filter = EnvFilter::try_new(filter_directive(level, directive))
        .unwrap_or_else(|_| EnvFilter::new(format!("route_smoke={}", level.to_tracing_level())));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
