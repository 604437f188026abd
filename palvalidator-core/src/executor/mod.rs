//! `ParallelExecutor` abstraction.

mod fixed_pool;
mod host_pool;
mod inline;
mod per_task_thread;

pub use fixed_pool::FixedPool;
pub use host_pool::HostPool;
pub use inline::Inline;
pub use per_task_thread::PerTaskThread;

use std::any::Any;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by task submission and join failures.
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("submission rejected: executor has been shut down")]
    ExecutorShutdown,

    #[error("task panicked: {0}")]
    TaskFailure(String),
}

/// A handle to a submitted task; `join` blocks until it completes and
/// propagates panics as `ExecutorError::TaskFailure`.
pub trait JoinHandle: Send {
    fn join(self: Box<Self>) -> Result<(), ExecutorError>;
}

/// Uniform task-submission interface over inline, thread-pool, or
/// host-pool execution.
pub trait ParallelExecutor: Send + Sync {
    fn submit(&self, task: Box<dyn FnOnce() + Send>) -> Result<Box<dyn JoinHandle>, ExecutorError>;

    /// Submits `n` tasks indexed `0..n`, waits for all of them, and
    /// propagates the first failure encountered. No ordering is guaranteed
    /// between tasks. `body` is `Arc`-wrapped so
    /// it can be captured by `'static` per-task closures regardless of
    /// which executor variant actually runs them on a separate thread.
    fn parallel_for(&self, n: usize, body: Arc<dyn Fn(usize) + Send + Sync>) -> Result<(), ExecutorError> {
        let mut handles = Vec::with_capacity(n);
        for i in 0..n {
            let body = body.clone();
            let task: Box<dyn FnOnce() + Send> = Box::new(move || body(i));
            handles.push(self.submit(task)?);
        }
        let mut first_error = None;
        for handle in handles {
            if let Err(e) = handle.join() {
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Runs `task`, catching panics and turning them into a `TaskFailure`, the
/// same contract `runner.hpp::post` gives its C++ callers via a
/// promise/future pair.
pub(crate) fn run_catching(task: Box<dyn FnOnce() + Send>) -> Result<(), ExecutorError> {
    std::panic::catch_unwind(std::panic::AssertUnwindSafe(task)).map_err(|payload| {
        ExecutorError::TaskFailure(panic_message(payload))
    })
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
