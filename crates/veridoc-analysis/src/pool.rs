//! Bounded worker pool for decode and inference work.
//!
//! Large images expand badly in memory; the pool caps how many documents
//! are being decoded or run through a model at once. One pool is shared
//! between the analyzer and the classifier engine.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Concurrency cap shared by the compute-heavy stages.
#[derive(Clone)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
}

impl WorkerPool {
    /// Pool sized to the machine's available cores.
    pub fn sized_to_cores() -> Self {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        Self::with_permits(cores)
    }

    /// Pool with an explicit permit count.
    pub fn with_permits(permits: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(permits.max(1))),
        }
    }

    /// Number of slots currently free.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Wait for a slot. The permit releases the slot when dropped.
    pub async fn acquire(&self) -> OwnedSemaphorePermit {
        self.permits
            .clone()
            .acquire_owned()
            .await
            .expect("worker pool semaphore closed")
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::sized_to_cores()
    }
}
