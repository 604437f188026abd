//! `FixedPool(n)` — a worker pool of `n` threads; submission enqueues onto
//! a mutex/condvar-guarded FIFO. Grounded on
//! `original_source/libs/concurrency/ParallelExecutors.h::ThreadPoolExecutor`.

use super::{run_catching, ExecutorError, JoinHandle, ParallelExecutor};
use std::collections::VecDeque;
use std::sync::mpsc;
use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle as ThreadHandle;

type Job = Box<dyn FnOnce() + Send>;

struct Shared {
    queue: Mutex<VecDeque<Job>>,
    condvar: Condvar,
    stopped: Mutex<bool>,
}

pub struct FixedPool {
    shared: Arc<Shared>,
    workers: Mutex<Vec<ThreadHandle<()>>>,
}

struct FixedPoolHandle(mpsc::Receiver<Result<(), ExecutorError>>);

impl JoinHandle for FixedPoolHandle {
    fn join(self: Box<Self>) -> Result<(), ExecutorError> {
        self.0.recv().unwrap_or(Err(ExecutorError::TaskFailure("worker dropped without a result".into())))
    }
}

impl FixedPool {
    /// `n == 0` means "detect hardware concurrency, minimum 2" (see
    /// 4.4).
    pub fn new(n: usize) -> Self {
        let n = if n == 0 {
            std::thread::available_parallelism().map(|p| p.get()).unwrap_or(2).max(2)
        } else {
            n
        };

        let shared = Arc::new(Shared { queue: Mutex::new(VecDeque::new()), condvar: Condvar::new(), stopped: Mutex::new(false) });

        let workers = (0..n)
            .map(|_| {
                let shared = shared.clone();
                std::thread::spawn(move || Self::worker_loop(shared))
            })
            .collect();

        Self { shared, workers: Mutex::new(workers) }
    }

    fn worker_loop(shared: Arc<Shared>) {
        loop {
            let job = {
                let mut queue = shared.queue.lock().expect("fixed pool queue poisoned");
                loop {
                    if let Some(job) = queue.pop_front() {
                        break Some(job);
                    }
                    if *shared.stopped.lock().expect("fixed pool stopped flag poisoned") {
                        break None;
                    }
                    queue = shared.condvar.wait(queue).expect("fixed pool condvar poisoned");
                }
            };
            match job {
                Some(job) => job(),
                None => return,
            }
        }
    }
}

impl ParallelExecutor for FixedPool {
    fn submit(&self, task: Box<dyn FnOnce() + Send>) -> Result<Box<dyn JoinHandle>, ExecutorError> {
        if *self.shared.stopped.lock().expect("fixed pool stopped flag poisoned") {
            return Err(ExecutorError::ExecutorShutdown);
        }
        let (tx, rx) = mpsc::channel();
        let job: Job = Box::new(move || {
            let result = run_catching(task);
            let _ = tx.send(result);
        });
        self.shared.queue.lock().expect("fixed pool queue poisoned").push_back(job);
        self.shared.condvar.notify_one();
        Ok(Box::new(FixedPoolHandle(rx)))
    }
}

impl Drop for FixedPool {
    fn drop(&mut self) {
        *self.shared.stopped.lock().expect("fixed pool stopped flag poisoned") = true;
        self.shared.condvar.notify_all();
        let mut workers = self.workers.lock().expect("fixed pool worker list poisoned");
        for worker in workers.drain(..) {
            let _ = worker.join();
        }
    }
}
