//! Single-slot cancellable scheduled task
use parking_lot::Mutex;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Holds at most one pending task. Scheduling a new task aborts the
/// previous one if it is still in its quiet period.
///
/// Once the delay elapses the task is detached onto its own tokio task, so
/// later `schedule` or `cancel` calls never interrupt work already running.
#[derive(Default)]
pub struct Debouncer {
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms `task` to run after `delay` on the current tokio runtime.
    /// Returns true when a task still waiting out its delay was superseded.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn schedule<F>(&self, delay: Duration, task: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut slot = self.pending.lock();
        let superseded = match slot.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        };

        *slot = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // No await after this point: the slot handle finishes here.
            tokio::spawn(task);
        }));
        superseded
    }

    /// Aborts the task waiting out its delay, if any. Returns true when one
    /// was pending.
    pub fn cancel(&self) -> bool {
        match self.pending.lock().take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}
