//! `HostPool` — delegates to an externally managed, lazily-initialized
//! process-wide pool, grounded on
//! `original_source/libs/concurrency/runner.hpp`'s `runner::instance()`
//! singleton.

use super::{ExecutorError, FixedPool, JoinHandle, ParallelExecutor};
use std::sync::{Arc, OnceLock};

static INSTANCE: OnceLock<Arc<FixedPool>> = OnceLock::new();

fn shared_pool() -> &'static Arc<FixedPool> {
    INSTANCE.get_or_init(|| Arc::new(FixedPool::new(0)))
}

/// A handle to the process-wide pool. Cheap to construct repeatedly; every
/// instance shares the same underlying threads.
pub struct HostPool {
    inner: Arc<FixedPool>,
}

impl Default for HostPool {
    fn default() -> Self {
        Self::new()
    }
}

impl HostPool {
    pub fn new() -> Self {
        Self { inner: shared_pool().clone() }
    }
}

impl ParallelExecutor for HostPool {
    fn submit(&self, task: Box<dyn FnOnce() + Send>) -> Result<Box<dyn JoinHandle>, ExecutorError> {
        self.inner.submit(task)
    }
}
