pub mod histogram;
pub mod record;
pub mod report;
pub mod stats;

pub use histogram::Histogram;
pub use record::Sample;
pub use report::BenchmarkReport;
pub use stats::LatencySummary;
