use derive_new::new;
use serde::{Deserialize, Serialize};

/// One recorded observation for a single completed request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, new)]
pub struct Sample {
    pub latency_ms: f64,
    pub status: u16,
}
