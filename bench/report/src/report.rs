use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use colored::Colorize;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::histogram::Histogram;
use crate::record::Sample;
use crate::stats::LatencySummary;

/// Maximum width of the proportional histogram bar.
const HISTOGRAM_BAR_BLOCKS: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub elapsed_secs: f64,
    pub total_samples: u64,
    pub failed_requests: u64,
    pub latency: Option<LatencySummary>,
    pub histogram: Option<Histogram>,
    pub status_counts: HashMap<u16, u64>,
}

impl BenchmarkReport {
    /// Reduces the flattened sample set into the final report. Runs exactly
    /// once per benchmark, after all workers finished or were abandoned.
    pub fn aggregate(samples: Vec<Sample>, failed_requests: u64, elapsed: Duration) -> Self {
        let latencies: Vec<f64> = samples.iter().map(|s| s.latency_ms).collect();
        let mut status_counts = HashMap::new();
        for sample in &samples {
            *status_counts.entry(sample.status).or_insert(0) += 1;
        }

        BenchmarkReport {
            elapsed_secs: elapsed.as_secs_f64(),
            total_samples: samples.len() as u64,
            failed_requests,
            latency: LatencySummary::from_latencies(&latencies),
            histogram: Histogram::from_latencies(&latencies),
            status_counts,
        }
    }

    pub fn print_summary(&self) {
        println!();
        info!(
            "{}",
            format!(
                "Sent {} requests in {:.2} seconds ({} failed)",
                self.total_samples, self.elapsed_secs, self.failed_requests
            )
            .blue()
        );

        match &self.latency {
            Some(latency) => {
                info!(
                    "{}",
                    format!(
                        "Average request time: {:.4} ms, standard deviation: {:.4} ms",
                        latency.avg_latency_ms, latency.std_dev_latency_ms
                    )
                    .green()
                );
                info!("Response time percentiles:");
                for entry in &latency.percentiles {
                    info!("{:>3.0}% in {:.3} ms", entry.percentile, entry.latency_ms);
                }
            }
            None => info!("{}", "No samples recorded, no latency data".yellow()),
        }

        match &self.histogram {
            Some(histogram) => {
                info!("Response time histogram:");
                for bucket in &histogram.buckets {
                    let blocks = ((bucket.count as f64 / self.total_samples as f64)
                        * HISTOGRAM_BAR_BLOCKS)
                        .round() as usize;
                    info!(
                        "{:.3} - {:.3} ms [{}] {}",
                        bucket.lower_ms,
                        bucket.upper_ms,
                        bucket.count,
                        "▄".repeat(blocks)
                    );
                }
            }
            None if self.total_samples > 0 => {
                info!("{}", "Insufficient samples for a histogram".yellow());
            }
            None => {}
        }

        info!("Status code statistics:");
        let mut codes: Vec<_> = self.status_counts.iter().collect();
        codes.sort();
        for (code, count) in codes {
            info!("{} : {}", code, count);
        }
    }

    pub fn dump_to_json(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(latency_ms: f64, status: u16) -> Sample {
        Sample::new(latency_ms, status)
    }

    #[test]
    fn status_codes_are_tallied() {
        let samples = vec![
            sample(1.0, 200),
            sample(2.0, 200),
            sample(3.0, 404),
            sample(4.0, 200),
            sample(5.0, 500),
        ];
        let report = BenchmarkReport::aggregate(samples, 0, Duration::from_secs(1));

        assert_eq!(report.total_samples, 5);
        assert_eq!(report.status_counts[&200], 3);
        assert_eq!(report.status_counts[&404], 1);
        assert_eq!(report.status_counts[&500], 1);
    }

    #[test]
    fn empty_sample_set_reports_no_data() {
        let report = BenchmarkReport::aggregate(Vec::new(), 7, Duration::from_secs(2));

        assert_eq!(report.total_samples, 0);
        assert_eq!(report.failed_requests, 7);
        assert!(report.latency.is_none());
        assert!(report.histogram.is_none());
        assert!(report.status_counts.is_empty());
        // Printing must not panic on the empty report.
        report.print_summary();
    }

    #[test]
    fn aggregate_computes_latency_summary() {
        let samples: Vec<Sample> = (1..=10).map(|i| sample(f64::from(i), 200)).collect();
        let report = BenchmarkReport::aggregate(samples, 0, Duration::from_secs(1));

        let latency = report.latency.unwrap();
        assert!((latency.avg_latency_ms - 5.5).abs() < 1e-6);
        let p50 = latency
            .percentiles
            .iter()
            .find(|e| e.percentile == 50.0)
            .unwrap();
        assert_eq!(p50.latency_ms, 5.0);
    }

    #[test]
    fn report_round_trips_through_json() {
        let samples = vec![sample(1.0, 200), sample(2.0, 200), sample(3.0, 404)];
        let report = BenchmarkReport::aggregate(samples, 1, Duration::from_millis(1500));

        let json = serde_json::to_string(&report).unwrap();
        let parsed: BenchmarkReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }
}
