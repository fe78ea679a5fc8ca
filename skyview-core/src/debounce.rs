//! Cancellable timers and a trailing-edge debouncer built on them.

use std::{future::Future, time::Duration};

use parking_lot::Mutex;
use tokio::task::AbortHandle;

/// Handle to a task scheduled with [`schedule`].
#[derive(Debug)]
pub struct TimerHandle {
    abort: AbortHandle,
}

impl TimerHandle {
    /// Cancel the task. Has no effect once it has completed.
    pub fn cancel(&self) {
        self.abort.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.abort.is_finished()
    }
}

/// Run `task` after `after` has elapsed, unless cancelled first.
///
/// Must be called from within a tokio runtime.
pub fn schedule<F>(after: Duration, task: F) -> TimerHandle
where
    F: Future<Output = ()> + Send + 'static,
{
    let handle = tokio::spawn(async move {
        tokio::time::sleep(after).await;
        task.await;
    });

    TimerHandle {
        abort: handle.abort_handle(),
    }
}

/// Trailing-edge debouncer: only the last task scheduled within the quiet
/// window runs.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<TimerHandle>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancel whatever is pending and re-arm the timer with `task`.
    pub fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut pending = self.pending.lock();
        if let Some(previous) = pending.take() {
            previous.cancel();
        }
        *pending = Some(schedule(self.delay, task));
    }

    pub fn cancel(&self) {
        if let Some(previous) = self.pending.lock().take() {
            previous.cancel();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter_task(counter: Arc<AtomicUsize>, value: usize) -> impl Future<Output = ()> {
        async move {
            counter.fetch_add(value, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn scheduled_task_runs_after_delay() {
        let fired = Arc::new(AtomicUsize::new(0));
        let handle = schedule(Duration::from_millis(300), counter_task(fired.clone(), 1));

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_timer_never_fires() {
        let fired = Arc::new(AtomicUsize::new(0));
        let handle = schedule(Duration::from_millis(300), counter_task(fired.clone(), 1));

        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.cancel();
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn burst_runs_only_the_last_task() {
        let total = Arc::new(AtomicUsize::new(0));
        let debouncer = Debouncer::new(Duration::from_millis(300));

        debouncer.schedule(counter_task(total.clone(), 1));
        tokio::time::sleep(Duration::from_millis(50)).await;
        debouncer.schedule(counter_task(total.clone(), 10));
        tokio::time::sleep(Duration::from_millis(50)).await;
        debouncer.schedule(counter_task(total.clone(), 100));
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(301)).await;

        assert_eq!(total.load(Ordering::SeqCst), 100);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn rearming_restarts_the_quiet_window() {
        let total = Arc::new(AtomicUsize::new(0));
        let debouncer = Debouncer::new(Duration::from_millis(300));

        debouncer.schedule(counter_task(total.clone(), 1));
        tokio::time::sleep(Duration::from_millis(250)).await;
        debouncer.schedule(counter_task(total.clone(), 2));
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(total.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(total.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_clears_pending_task() {
        let total = Arc::new(AtomicUsize::new(0));
        let debouncer = Debouncer::new(Duration::from_millis(300));

        debouncer.schedule(counter_task(total.clone(), 1));
        debouncer.cancel();
        assert!(!debouncer.is_pending());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(total.load(Ordering::SeqCst), 0);
    }
}
