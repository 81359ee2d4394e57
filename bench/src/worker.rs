use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use httpbench_report::Sample;
use tokio::sync::watch;
use tracing::warn;

use crate::sink::ResultSink;
use crate::transport::Transport;

/// One concurrent unit of execution. Issues requests sequentially (one in
/// flight at a time) and appends outcomes to its own slot in the sink.
pub struct Worker {
    id: usize,
    transport: Arc<dyn Transport>,
    sink: Arc<ResultSink>,
    failed: Arc<AtomicU64>,
}

impl Worker {
    pub fn new(
        id: usize,
        transport: Arc<dyn Transport>,
        sink: Arc<ResultSink>,
        failed: Arc<AtomicU64>,
    ) -> Self {
        Worker {
            id,
            transport,
            sink,
            failed,
        }
    }

    /// Issues exactly `requests` sequential requests, then completes.
    pub async fn run_batch(&self, requests: u32) {
        for _ in 0..requests {
            self.issue().await;
        }
    }

    /// Repeats the batch until the stop signal fires. The signal is checked
    /// between requests; an in-flight request is never interrupted.
    pub async fn run_sustained(&self, batch: u32, stop: watch::Receiver<bool>) {
        if batch == 0 {
            return;
        }
        loop {
            for _ in 0..batch {
                if *stop.borrow() {
                    return;
                }
                self.issue().await;
            }
        }
    }

    /// Issues a single request, then completes.
    pub async fn run_once(&self) {
        self.issue().await;
    }

    async fn issue(&self) {
        match self.transport.execute().await {
            Ok(outcome) => {
                let latency_ms = outcome.latency.as_secs_f64() * 1000.0;
                self.sink
                    .record(self.id, Sample::new(latency_ms, outcome.status));
            }
            Err(error) => {
                // Failed requests are dropped from the statistics, only the
                // failure counter sees them. No retry.
                self.failed.fetch_add(1, Ordering::Relaxed);
                warn!("Worker #{} request failed: {error}", self.id);
            }
        }
    }
}
