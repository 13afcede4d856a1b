// lane.rs

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use thiserror::Error;
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::transform::EnqueueTransform;

#[derive(Debug, Error)]
pub enum LaneError {
    #[error("drain worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Configuration for a single lane
#[derive(Debug, Clone)]
pub struct LaneConfig {
    /// Wall-clock pause between drain attempts
    pub drain_interval: Duration,
}

impl Default for LaneConfig {
    fn default() -> Self {
        Self {
            drain_interval: Duration::from_millis(500),
        }
    }
}

/// One FIFO buffer plus its background drain worker.
///
/// The buffer is unbounded and strictly FIFO: `enqueue` appends to the tail,
/// the worker pops from the front, nothing ever reorders it. All buffer
/// access goes through one mutex, so concurrent enqueues and the worker's
/// dequeue never interleave mid-operation.
///
/// The worker is a tokio task spawned by `init`. It removes and discards one
/// head item per drain interval while the running flag is set. `close` flips
/// the flag and nudges the worker awake; it does not wait. `shutdown` is the
/// joining variant for callers that want deterministic termination.
pub struct Lane<T, X: EnqueueTransform<T>> {
    buffer: Arc<Mutex<VecDeque<T>>>,
    running: Arc<AtomicBool>,
    stop: Arc<Notify>,
    transform: X,
    config: LaneConfig,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + 'static, X: EnqueueTransform<T>> Lane<T, X> {
    /// Create a lane with the given enqueue transform. The lane starts
    /// stopped and empty; call `init` to start draining.
    pub fn new(transform: X, config: LaneConfig) -> Self {
        Self {
            buffer: Arc::new(Mutex::new(VecDeque::new())),
            running: Arc::new(AtomicBool::new(false)),
            stop: Arc::new(Notify::new()),
            transform,
            config,
            worker: Mutex::new(None),
        }
    }

    /// Clear the buffer and start the drain worker.
    ///
    /// The running flag is set before the worker task is spawned, so the
    /// worker cannot observe "not running" on its first iteration and exit
    /// early. Calling `init` on an already-running lane clears the buffer
    /// again but does not spawn a second worker.
    pub async fn init(&self) {
        self.buffer.lock().await.clear();

        let mut worker = self.worker.lock().await;
        if self.running.load(Ordering::SeqCst) {
            return; // worker already attached
        }
        if let Some(previous) = worker.take() {
            // A prior close() left its worker winding down. Join it while
            // the running flag is still false, so it cannot observe the new
            // start and keep looping; the extra nudge covers a worker still
            // parked in its sleep.
            self.stop.notify_one();
            let _ = previous.await;
        }
        self.running.store(true, Ordering::SeqCst);
        *worker = Some(self.spawn_worker());
    }

    /// Request the drain worker to stop. Advisory and non-blocking: the
    /// worker may complete one more dequeue cycle before it observes the
    /// flag. Remaining items are left in the buffer. Safe to call twice and
    /// safe to call before `init`.
    pub fn close(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.stop.notify_one();
    }

    /// `close`, then wait for the worker task to terminate.
    pub async fn shutdown(&self) -> Result<(), LaneError> {
        self.close();
        if let Some(handle) = self.worker.lock().await.take() {
            handle.await?;
        }
        Ok(())
    }

    /// Append an item to the tail of the buffer, applying the lane's
    /// transform first. Both happen inside the same critical section, so the
    /// transform runs exactly once per item and never races the worker.
    ///
    /// The buffer is unbounded; enqueue never rejects. Enqueuing before
    /// `init` is legal — items simply accumulate until a worker drains them
    /// (note that `init` clears whatever accumulated).
    pub async fn enqueue(&self, mut item: T) {
        let mut buffer = self.buffer.lock().await;
        self.transform.apply(&mut item);
        buffer.push_back(item);
    }

    /// Current number of buffered items.
    pub async fn len(&self) -> usize {
        self.buffer.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.buffer.lock().await.is_empty()
    }

    /// Copy of the buffered items in FIFO order.
    pub async fn snapshot(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.buffer.lock().await.iter().cloned().collect()
    }

    fn spawn_worker(&self) -> JoinHandle<()> {
        let buffer = self.buffer.clone();
        let running = self.running.clone();
        let stop = self.stop.clone();
        let interval = self.config.drain_interval;

        tokio::spawn(async move {
            debug!("drain worker started, interval {:?}", interval);
            while running.load(Ordering::Relaxed) {
                {
                    let mut buffer = buffer.lock().await;
                    // Head item is removed and dropped; the lane does no
                    // further processing.
                    buffer.pop_front();
                }
                tokio::select! {
                    _ = sleep(interval) => {}
                    _ = stop.notified() => {}
                }
            }
            debug!("drain worker stopped");
        })
    }
}
