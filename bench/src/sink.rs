use std::sync::Mutex;

use httpbench_report::Sample;

/// Per-worker sample slots, allocated before any worker is spawned.
///
/// Slot `i` is written only by worker `i` for the entire run, so the locks
/// are uncontended; they exist so the timeout path can snapshot the slots of
/// workers that are still mid-request.
#[derive(Debug)]
pub struct ResultSink {
    slots: Vec<Mutex<Vec<Sample>>>,
}

impl ResultSink {
    pub fn new(workers: u32) -> Self {
        Self {
            slots: (0..workers).map(|_| Mutex::new(Vec::new())).collect(),
        }
    }

    pub fn record(&self, worker_id: usize, sample: Sample) {
        self.slots[worker_id]
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(sample);
    }

    /// Flattens every slot into a single sample set for aggregation. A slot
    /// poisoned by a panicking worker still yields its recorded samples.
    pub fn drain(&self) -> Vec<Sample> {
        let mut samples = Vec::new();
        for slot in &self.slots {
            samples.append(&mut slot.lock().unwrap_or_else(|e| e.into_inner()));
        }
        samples
    }

    #[cfg(test)]
    fn poison_slot(&self, worker_id: usize) {
        let slot = &self.slots[worker_id];
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = slot.lock().unwrap();
            panic!("poisoning the slot");
        }));
    }
}
