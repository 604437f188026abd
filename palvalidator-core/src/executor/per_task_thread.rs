//! `PerTaskThread` — spawns one new worker thread per task; the portable
//! fallback variant, grounded on
//! `original_source/libs/timeserieslib/ParallelExecutors.h::StdAsyncExecutor`.

use super::{run_catching, ExecutorError, JoinHandle, ParallelExecutor};
use std::thread;

pub struct PerTaskThread;

struct ThreadHandle(thread::JoinHandle<Result<(), ExecutorError>>);

impl JoinHandle for ThreadHandle {
    fn join(self: Box<Self>) -> Result<(), ExecutorError> {
        self.0.join().unwrap_or(Err(ExecutorError::TaskFailure("thread panicked outside catch_unwind".into())))
    }
}

impl ParallelExecutor for PerTaskThread {
    fn submit(&self, task: Box<dyn FnOnce() + Send>) -> Result<Box<dyn JoinHandle>, ExecutorError> {
        let handle = thread::spawn(move || run_catching(task));
        Ok(Box::new(ThreadHandle(handle)))
    }
}
