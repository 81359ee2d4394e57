use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use httpbench_report::BenchmarkReport;
use tokio::sync::watch;
use tokio::time::{sleep, Instant};
use tracing::{info, warn};

use crate::args::{Args, Mode};
use crate::error::BenchmarkError;
use crate::sink::ResultSink;
use crate::transport::Transport;
use crate::worker::Worker;

/// Immutable run parameters, constructed once at startup.
#[derive(Debug, Clone, Copy)]
pub struct RunConfig {
    pub workers: u32,
    pub total_requests: u32,
    pub timeout: Duration,
    pub mode: Mode,
}

impl From<&Args> for RunConfig {
    fn from(args: &Args) -> Self {
        RunConfig {
            workers: args.workers,
            total_requests: args.requests,
            timeout: *args.timeout,
            mode: args.mode,
        }
    }
}

pub struct BenchmarkRunner {
    config: RunConfig,
    transport: Arc<dyn Transport>,
}

impl BenchmarkRunner {
    pub fn new(config: RunConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// Spawns the worker pool, waits for completion or timeout (whichever
    /// comes first) and produces exactly one report.
    pub async fn run(&self) -> Result<BenchmarkReport, BenchmarkError> {
        let requests_per_worker = self.requests_per_worker()?;
        let workers = self.config.workers;
        let mode = self.config.mode;
        let sink = Arc::new(ResultSink::new(workers));
        let failed = Arc::new(AtomicU64::new(0));
        let (stop_sender, stop_receiver) = watch::channel(false);

        info!(
            "Spawning {} worker(s), {} request(s) per worker, mode: {}",
            workers, requests_per_worker, mode
        );

        let started = Instant::now();
        let mut handles = Vec::with_capacity(workers as usize);
        for id in 0..workers as usize {
            let worker = Worker::new(id, self.transport.clone(), sink.clone(), failed.clone());
            let stop = stop_receiver.clone();
            handles.push(tokio::spawn(async move {
                match mode {
                    Mode::Fixed => worker.run_batch(requests_per_worker).await,
                    Mode::Sustained => worker.run_sustained(requests_per_worker, stop).await,
                    Mode::Concurrent => worker.run_once().await,
                }
            }));
        }
        drop(stop_receiver);

        // The all-workers-done path and the timeout path race here; whichever
        // branch wins, aggregation below runs exactly once and the losing
        // branch is dropped without producing a second report. Workers that
        // are still mid-request on timeout are abandoned, not cancelled.
        tokio::select! {
            results = join_all(handles) => {
                for result in results {
                    if let Err(error) = result {
                        warn!("Worker task panicked: {error}");
                    }
                }
                info!("All workers finished");
            }
            _ = sleep(self.config.timeout) => {
                info!(
                    "Timeout of {} reached, abandoning unfinished workers",
                    humantime::format_duration(self.config.timeout)
                );
            }
        }
        let _ = stop_sender.send(true);

        let samples = sink.drain();
        let report =
            BenchmarkReport::aggregate(samples, failed.load(Ordering::Relaxed), started.elapsed());
        Ok(report)
    }

    fn requests_per_worker(&self) -> Result<u32, BenchmarkError> {
        match self.config.mode {
            // Concurrent mode ignores the total request count entirely.
            Mode::Concurrent => Ok(1),
            Mode::Fixed | Mode::Sustained => {
                if self.config.total_requests % self.config.workers != 0 {
                    return Err(BenchmarkError::UnevenRequestSplit {
                        requests: self.config.total_requests,
                        workers: self.config.workers,
                    });
                }
                Ok(self.config.total_requests / self.config.workers)
            }
        }
    }
}
