//! I/O worker pool: dedicated threads fed by a crossbeam channel.
//!
//! CPU-bound work goes through rayon; persistence goes here so slow storage
//! never starves the compute pool. `submit` returns a handle whose `join`
//! blocks for the task's result, which is how the orchestrator expresses
//! the dependency edge between the report write and the run-record update.

use std::thread;

use crossbeam_channel::{Receiver, Sender};

use crate::errors::AnalysisError;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Handle to a submitted task.
pub struct TaskHandle<T> {
    receiver: Receiver<T>,
}

impl<T> TaskHandle<T> {
    /// Blocks until the task finishes and returns its result.
    pub fn join(self) -> Result<T, AnalysisError> {
        self.receiver.recv().map_err(|_| AnalysisError::TaskFailed {
            message: "worker dropped before delivering a result".to_string(),
        })
    }
}

/// Fixed-size pool of I/O worker threads.
pub struct IoPool {
    sender: Option<Sender<Job>>,
    workers: Vec<thread::JoinHandle<()>>,
}

impl IoPool {
    /// Pool sized for I/O: twice the available parallelism, at least four.
    pub fn with_default_size() -> Self {
        let parallelism = thread::available_parallelism().map(|n| n.get()).unwrap_or(2);
        Self::new((parallelism * 2).max(4))
    }

    pub fn new(threads: usize) -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded::<Job>();
        let workers = (0..threads.max(1))
            .map(|index| {
                let receiver: Receiver<Job> = receiver.clone();
                thread::Builder::new()
                    .name(format!("sqlguard-io-{index}"))
                    .spawn(move || {
                        while let Ok(job) = receiver.recv() {
                            job();
                        }
                    })
                    .expect("failed to spawn I/O worker")
            })
            .collect();

        Self {
            sender: Some(sender),
            workers,
        }
    }

    /// Schedules a task and returns its handle.
    pub fn submit<T, F>(&self, task: F) -> TaskHandle<T>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let (result_tx, result_rx) = crossbeam_channel::bounded(1);
        let job: Job = Box::new(move || {
            let _ = result_tx.send(task());
        });
        self.sender
            .as_ref()
            .expect("pool is shut down")
            .send(job)
            .expect("I/O workers are gone");
        TaskHandle {
            receiver: result_rx,
        }
    }
}

impl Drop for IoPool {
    fn drop(&mut self) {
        // Closing the channel lets each worker drain and exit.
        drop(self.sender.take());
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}
