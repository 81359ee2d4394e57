use serde::{Deserialize, Serialize};

/// Percentiles reported in the summary table.
pub const PERCENTILES: [f64; 7] = [10.0, 25.0, 50.0, 75.0, 90.0, 95.0, 99.0];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileEntry {
    pub percentile: f64,
    pub latency_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencySummary {
    pub avg_latency_ms: f64,
    pub std_dev_latency_ms: f64,
    pub percentiles: Vec<PercentileEntry>,
}

impl LatencySummary {
    /// Returns `None` for an empty sample set so callers never divide by zero.
    pub fn from_latencies(latencies: &[f64]) -> Option<Self> {
        if latencies.is_empty() {
            return None;
        }
        let count = latencies.len() as f64;
        let avg = latencies.iter().sum::<f64>() / count;
        // Population standard deviation: divide by N, not N - 1.
        let variance = latencies.iter().map(|l| (l - avg) * (l - avg)).sum::<f64>() / count;

        let mut sorted = latencies.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let percentiles = PERCENTILES
            .iter()
            .map(|&percentile| PercentileEntry {
                percentile,
                latency_ms: nearest_rank(&sorted, percentile),
            })
            .collect();

        Some(LatencySummary {
            avg_latency_ms: avg,
            std_dev_latency_ms: variance.sqrt(),
            percentiles,
        })
    }
}

/// Nearest-rank percentile: `ceil(p / 100 * N)` used as a 1-based index into
/// the sorted data, clamped to `[1, N]`. No interpolation. `sorted` must be
/// non-empty, which `from_latencies` guarantees.
fn nearest_rank(sorted: &[f64], percentile: f64) -> f64 {
    let rank = ((percentile / 100.0) * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}
