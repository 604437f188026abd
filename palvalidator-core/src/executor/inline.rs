//! `Inline` — executes synchronously on the calling thread. Used for
//! deterministic tests.

use super::{run_catching, ExecutorError, JoinHandle, ParallelExecutor};

pub struct Inline;

struct CompletedHandle(Result<(), ExecutorError>);

impl JoinHandle for CompletedHandle {
    fn join(self: Box<Self>) -> Result<(), ExecutorError> {
        self.0
    }
}

impl ParallelExecutor for Inline {
    fn submit(&self, task: Box<dyn FnOnce() + Send>) -> Result<Box<dyn JoinHandle>, ExecutorError> {
        Ok(Box::new(CompletedHandle(run_catching(task))))
    }
}
