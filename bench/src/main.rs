mod args;
mod error;
mod runner;
mod sink;
mod transport;
mod worker;

use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use crate::args::Args;
use crate::error::BenchmarkError;
use crate::runner::{BenchmarkRunner, RunConfig};
use crate::transport::HttpTransport;

#[tokio::main]
async fn main() {
    let args = Args::parse();
    tracing_subscriber::fmt::init();
    args.validate();

    if let Err(e) = run(args).await {
        error!("Benchmark failed: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), BenchmarkError> {
    info!(
        "Running benchmark with mode={}, url={}, workers={}, total requests={}, timeout={}",
        args.mode, args.url, args.workers, args.requests, args.timeout
    );

    let transport = HttpTransport::new(
        &args.url,
        *args.timeout,
        args.workers,
        args.disable_keepalive,
        args.insecure,
    )?;
    let runner = BenchmarkRunner::new(RunConfig::from(&args), Arc::new(transport));
    let report = runner.run().await?;

    report.print_summary();
    if let Some(path) = &args.output {
        report.dump_to_json(path)?;
        info!("Report written to {}", path.display());
    }
    Ok(())
}
