use thiserror::Error;

#[derive(Debug, Error)]
pub enum BenchmarkError {
    #[error("Total requests ({requests}) must be evenly divisible by the number of workers ({workers})")]
    UnevenRequestSplit { requests: u32, workers: u32 },
    #[error("Cannot parse target URL: {0}")]
    InvalidUrl(String),
    #[error("Cannot build the HTTP client")]
    CannotBuildClient(#[source] reqwest::Error),
    #[error("Request failed: {0}")]
    RequestFailed(String),
    #[error("Cannot write the report")]
    CannotWriteReport(#[from] std::io::Error),
}
