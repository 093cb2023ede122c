//! Designated-thread executor backed by a job queue.

use bridge_traits::dispatch::{MainThreadExecutor, MainThreadJob};
use parking_lot::Mutex;
use std::thread::{self, ThreadId};
use tokio::sync::mpsc;
use tracing::{trace, warn};

/// Executor bound to one owner thread.
///
/// Jobs enqueued from other threads wait in a FIFO queue until the owner
/// thread calls [`run_pending`](Self::run_pending), typically once per turn
/// of the host event loop.
pub struct QueueExecutor {
    owner: ThreadId,
    sender: mpsc::UnboundedSender<MainThreadJob>,
    receiver: Mutex<mpsc::UnboundedReceiver<MainThreadJob>>,
}

impl QueueExecutor {
    /// Bind the executor to the calling thread.
    pub fn for_current_thread() -> Self {
        Self::for_thread(thread::current().id())
    }

    /// Bind the executor to `owner`.
    pub fn for_thread(owner: ThreadId) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            owner,
            sender,
            receiver: Mutex::new(receiver),
        }
    }

    pub fn owner(&self) -> ThreadId {
        self.owner
    }

    /// Run every job queued so far, in enqueue order, and return how many ran.
    ///
    /// Jobs enqueued while draining wait for the next call. Calls from any
    /// thread other than the owner run nothing.
    pub fn run_pending(&self) -> usize {
        if !self.is_main_thread() {
            warn!("run_pending called off the owner thread");
            return 0;
        }

        let jobs: Vec<MainThreadJob> = {
            let mut receiver = self.receiver.lock();
            let mut jobs = Vec::new();
            while let Ok(job) = receiver.try_recv() {
                jobs.push(job);
            }
            jobs
        };

        let count = jobs.len();
        for job in jobs {
            job();
        }
        if count > 0 {
            trace!(count, "ran queued main-thread jobs");
        }
        count
    }
}

impl MainThreadExecutor for QueueExecutor {
    fn is_main_thread(&self) -> bool {
        thread::current().id() == self.owner
    }

    fn enqueue(&self, job: MainThreadJob) {
        if self.sender.send(job).is_err() {
            warn!("main-thread queue closed, dropping job");
        }
    }
}

impl std::fmt::Debug for QueueExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueExecutor")
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}
