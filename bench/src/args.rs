use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, ValueEnum};
use humantime::Duration;

/// Scheduling strategy for the worker pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Every worker issues an equal, pre-divided share of the total requests.
    Fixed,
    /// Workers repeat their request batches until the timeout fires.
    Sustained,
    /// Every worker issues exactly one request.
    Concurrent,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Fixed => write!(f, "fixed"),
            Mode::Sustained => write!(f, "sustained"),
            Mode::Concurrent => write!(f, "concurrent"),
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "HTTP GET load-generation benchmark", long_about = None)]
pub struct Args {
    /// Target URL
    #[arg(long, default_value = "http://localhost:8080")]
    pub url: String,

    /// Number of concurrent workers
    #[arg(long, short = 'w', default_value_t = 10)]
    pub workers: u32,

    /// Total number of requests (ignored in concurrent mode)
    #[arg(long, short = 'r', default_value_t = 100)]
    pub requests: u32,

    /// Run timeout, e.g. 30s or 1m
    #[arg(long, short = 't', default_value_t = Duration::from_str("60s").unwrap(), value_parser = Duration::from_str)]
    pub timeout: Duration,

    /// Scheduling mode
    #[arg(long, value_enum, default_value_t = Mode::Fixed)]
    pub mode: Mode,

    /// Prevent reuse of TCP connections
    #[arg(long, default_value_t = false)]
    pub disable_keepalive: bool,

    /// Skip TLS certificate verification
    #[arg(long, default_value_t = false)]
    pub insecure: bool,

    /// Write the report as JSON to the given file
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

impl Args {
    pub fn validate(&self) {
        if self.workers == 0 {
            Args::command()
                .error(
                    ErrorKind::InvalidValue,
                    "Number of workers must be greater than zero",
                )
                .exit();
        }
        if self.timeout.is_zero() {
            Args::command()
                .error(ErrorKind::InvalidValue, "Timeout must be greater than zero")
                .exit();
        }
    }
}
