//! Marshaling onto the designated thread.

use bridge_traits::dispatch::MainThreadExecutor;

/// Run `job` on the designated thread.
///
/// Runs synchronously when the caller is already on that thread, otherwise
/// enqueues it and returns immediately.
pub fn run_on_main<F>(executor: &dyn MainThreadExecutor, job: F)
where
    F: FnOnce() + Send + 'static,
{
    if executor.is_main_thread() {
        job();
    } else {
        executor.enqueue(Box::new(job));
    }
}
