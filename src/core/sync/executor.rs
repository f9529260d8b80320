/*!
 * Serial Executor
 *
 * A single consumer thread that owns a piece of state and runs submitted
 * jobs against it one at a time, strictly in submission order.
 *
 * # Design
 *
 * The state never leaves the executor thread, so jobs get `&mut S` without
 * any lock. Submission goes through an unbounded `flume` channel and never
 * blocks the caller; request/response calls use a `flume::bounded(1)`
 * reply channel.
 *
 * Jobs must not call back into the same executor's blocking methods
 * (`call`, `submit_blocking`, `flush`): the reply could never be produced.
 */

use crate::core::errors::{CounterError, CounterResult};
use parking_lot::Mutex;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error};

type Job<S> = Box<dyn FnOnce(&mut S) + Send + 'static>;

enum Message<S> {
    Run(Job<S>),
    Shutdown,
}

/// Ordered single-consumer execution context owning `S`
pub struct SerialExecutor<S: Send + 'static> {
    sender: flume::Sender<Message<S>>,
    pending: Arc<AtomicUsize>,
    handle: Mutex<Option<JoinHandle<()>>>,
    name: String,
}

impl<S: Send + 'static> SerialExecutor<S> {
    /// Start the executor thread with its initial state
    pub fn spawn(name: impl Into<String>, state: S) -> CounterResult<Self> {
        let name = name.into();
        let (sender, receiver) = flume::unbounded::<Message<S>>();
        let pending = Arc::new(AtomicUsize::new(0));
        let worker_pending = Arc::clone(&pending);

        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || Self::run_loop(receiver, state, worker_pending))
            .map_err(|e| CounterError::SpawnFailed(e.to_string()))?;

        debug!(executor = %name, "serial executor started");

        Ok(Self {
            sender,
            pending,
            handle: Mutex::new(Some(handle)),
            name,
        })
    }

    fn run_loop(receiver: flume::Receiver<Message<S>>, mut state: S, pending: Arc<AtomicUsize>) {
        while let Ok(message) = receiver.recv() {
            match message {
                Message::Run(job) => {
                    if catch_unwind(AssertUnwindSafe(|| job(&mut state))).is_err() {
                        error!("serial executor job panicked; continuing with next job");
                    }
                    pending.fetch_sub(1, Ordering::AcqRel);
                }
                Message::Shutdown => break,
            }
        }
    }

    /// Enqueue a job and return immediately
    pub fn submit<F>(&self, job: F) -> CounterResult<()>
    where
        F: FnOnce(&mut S) + Send + 'static,
    {
        self.pending.fetch_add(1, Ordering::AcqRel);
        if self.sender.send(Message::Run(Box::new(job))).is_err() {
            self.pending.fetch_sub(1, Ordering::AcqRel);
            return Err(CounterError::ExecutorClosed);
        }
        Ok(())
    }

    /// Run a job on the executor thread and wait for its result
    pub fn call<F, R>(&self, job: F) -> CounterResult<R>
    where
        F: FnOnce(&mut S) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (reply_tx, reply_rx) = flume::bounded(1);
        self.submit(move |state| {
            let _ = reply_tx.send(job(state));
        })?;
        Ok(reply_rx.recv()?)
    }

    /// Enqueue a job and wait until it has executed
    pub fn submit_blocking<F>(&self, job: F) -> CounterResult<()>
    where
        F: FnOnce(&mut S) + Send + 'static,
    {
        self.call(job)
    }

    /// Wait until every job submitted before this call has executed
    ///
    /// Returns `Ok(false)` if `timeout` elapsed first.
    pub fn flush(&self, timeout: Duration) -> CounterResult<bool> {
        let (reply_tx, reply_rx) = flume::bounded(1);
        self.submit(move |_| {
            let _ = reply_tx.send(());
        })?;
        match reply_rx.recv_timeout(timeout) {
            Ok(()) => Ok(true),
            Err(flume::RecvTimeoutError::Timeout) => Ok(false),
            Err(flume::RecvTimeoutError::Disconnected) => Err(CounterError::ExecutorClosed),
        }
    }

    /// Jobs submitted but not yet finished
    #[inline]
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    /// Executor thread name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<S: Send + 'static> Drop for SerialExecutor<S> {
    fn drop(&mut self) {
        // Queued jobs ahead of the shutdown marker still run
        let _ = self.sender.send(Message::Shutdown);
        if let Some(handle) = self.handle.lock().take() {
            if handle.thread().id() != thread::current().id() {
                let _ = handle.join();
            }
        }
        debug!(executor = %self.name, "serial executor stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jobs_run_in_submission_order() {
        let executor = SerialExecutor::spawn("order-test", Vec::new()).unwrap();
        for i in 0..100 {
            executor.submit(move |log: &mut Vec<i32>| log.push(i)).unwrap();
        }

        let log = executor.call(|log| log.clone()).unwrap();
        assert_eq!(log, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_flush_drains_pending() {
        let executor = SerialExecutor::spawn("flush-test", 0u64).unwrap();
        for _ in 0..50 {
            executor
                .submit(|n| {
                    thread::sleep(Duration::from_micros(100));
                    *n += 1;
                })
                .unwrap();
        }

        assert!(executor.flush(Duration::from_secs(5)).unwrap());
        assert_eq!(executor.pending(), 0);
        assert_eq!(executor.call(|n| *n).unwrap(), 50);
    }

    #[test]
    fn test_flush_timeout() {
        let executor = SerialExecutor::spawn("slow-test", ()).unwrap();
        executor
            .submit(|_| thread::sleep(Duration::from_millis(200)))
            .unwrap();

        assert!(!executor.flush(Duration::from_millis(10)).unwrap());
    }

    #[test]
    fn test_panicking_job_does_not_kill_executor() {
        let executor = SerialExecutor::spawn("panic-test", 0u32).unwrap();
        executor.submit(|_| panic!("job failure")).unwrap();
        executor.submit_blocking(|n| *n = 7).unwrap();

        assert_eq!(executor.call(|n| *n).unwrap(), 7);
        assert_eq!(executor.pending(), 0);
    }

    #[test]
    fn test_drop_runs_queued_jobs() {
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let executor = SerialExecutor::spawn("drop-test", ()).unwrap();
            for _ in 0..10 {
                let counter = Arc::clone(&counter);
                executor
                    .submit(move |_| {
                        counter.fetch_add(1, Ordering::SeqCst);
                    })
                    .unwrap();
            }
        }
        assert_eq!(counter.load(Ordering::SeqCst), 10);
    }
}
