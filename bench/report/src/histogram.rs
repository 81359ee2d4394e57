use serde::{Deserialize, Serialize};

/// Fixed number of latency buckets in the report.
pub const BUCKET_COUNT: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBucket {
    pub lower_ms: f64,
    pub upper_ms: f64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub buckets: Vec<HistogramBucket>,
}

impl Histogram {
    /// Builds the 15-bucket latency histogram. Requires at least 3 samples:
    /// the top two values are pinned as the last two bucket boundaries so a
    /// handful of outliers cannot stretch the bin width for everything else.
    pub fn from_latencies(latencies: &[f64]) -> Option<Self> {
        let n = latencies.len();
        if n < 3 {
            return None;
        }

        let mut sorted = latencies.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let min = sorted[0];
        let max = sorted[n - 1];
        let second_max = sorted[n - 2];
        let third_max = sorted[n - 3];

        // The first 13 bins span [min, third_max] evenly; the last two bucket
        // boundaries are the second-max and max values themselves.
        let bin_width = (third_max - min) / (BUCKET_COUNT as f64 - 2.0);
        let mut boundaries = [0.0; BUCKET_COUNT + 1];
        for (i, boundary) in boundaries.iter_mut().enumerate().take(BUCKET_COUNT - 1) {
            *boundary = min + i as f64 * bin_width;
        }
        boundaries[BUCKET_COUNT - 1] = second_max;
        boundaries[BUCKET_COUNT] = max;

        // Single monotonic pass over the sorted data: each sample lands in the
        // first bucket whose upper boundary is >= its value.
        let mut counts = [0u64; BUCKET_COUNT];
        let mut bucket = 0;
        for &latency in &sorted {
            while bucket + 1 < BUCKET_COUNT && latency > boundaries[bucket + 1] {
                bucket += 1;
            }
            counts[bucket] += 1;
        }

        let buckets = (0..BUCKET_COUNT)
            .map(|i| HistogramBucket {
                lower_ms: boundaries[i],
                upper_ms: boundaries[i + 1],
                count: counts[i],
            })
            .collect();

        Some(Histogram { buckets })
    }

    pub fn total_count(&self) -> u64 {
        self.buckets.iter().map(|b| b.count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_counts_sum_to_sample_count() {
        let latencies: Vec<f64> = (0..100).map(|i| (i * 7 % 53) as f64 + 0.5).collect();
        let histogram = Histogram::from_latencies(&latencies).unwrap();
        assert_eq!(histogram.buckets.len(), BUCKET_COUNT);
        assert_eq!(histogram.total_count(), latencies.len() as u64);
    }

    #[test]
    fn minimum_of_three_samples() {
        let histogram = Histogram::from_latencies(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(histogram.total_count(), 3);
    }

    #[test]
    fn fewer_than_three_samples_yields_no_histogram() {
        assert!(Histogram::from_latencies(&[]).is_none());
        assert!(Histogram::from_latencies(&[1.0]).is_none());
        assert!(Histogram::from_latencies(&[1.0, 2.0]).is_none());
    }

    #[test]
    fn outliers_pin_the_last_two_boundaries() {
        // 0..=13 gives an exact bin width of 1.0, so the two outliers are the
        // only values above the 13 evenly spaced bins.
        let mut latencies: Vec<f64> = (0..=13).map(f64::from).collect();
        latencies.push(500.0);
        latencies.push(1000.0);
        let histogram = Histogram::from_latencies(&latencies).unwrap();

        let last = histogram.buckets[BUCKET_COUNT - 1];
        let second_last = histogram.buckets[BUCKET_COUNT - 2];
        assert_eq!(last.upper_ms, 1000.0);
        assert_eq!(second_last.upper_ms, 500.0);
        // The two outliers sit alone in the pinned buckets.
        assert_eq!(last.count, 1);
        assert_eq!(second_last.count, 1);
        assert_eq!(histogram.total_count(), latencies.len() as u64);
    }

    #[test]
    fn identical_latencies_fall_into_one_bucket() {
        let histogram = Histogram::from_latencies(&[5.0; 10]).unwrap();
        assert_eq!(histogram.buckets[0].count, 10);
        assert_eq!(histogram.total_count(), 10);
    }
}
