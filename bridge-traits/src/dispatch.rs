//! Designated-thread execution.
//!
//! Controller state is confined to one host thread (the UI thread on mobile
//! platforms). Engine callbacks arrive on arbitrary threads, so the core
//! routes them through a [`MainThreadExecutor`] supplied by the host:
//!
//! - **iOS/macOS**: the main dispatch queue
//! - **Android**: the main `Looper` handler
//! - **Desktop**: the thread that owns the window/event loop
//!
//! Implementations must never block the calling thread while enqueueing.

/// Unit of work marshaled onto the designated thread.
pub type MainThreadJob = Box<dyn FnOnce() + Send + 'static>;

/// Host executor bound to the designated thread.
pub trait MainThreadExecutor: Send + Sync {
    /// Whether the calling thread is the designated thread.
    fn is_main_thread(&self) -> bool;

    /// Queue `job` for asynchronous execution on the designated thread.
    ///
    /// Jobs run in enqueue order. Must return without waiting for the job.
    fn enqueue(&self, job: MainThreadJob);
}
