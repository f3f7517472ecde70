//! Debounce and throttle for bursty callers such as input handlers

use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::task::AbortHandle;
use tokio::time::Instant;
use tracing::warn;

/// Runs only the last of a burst of calls, once `wait` has passed without a
/// newer one
#[derive(Debug)]
pub struct Debouncer {
    wait: Duration,
    pending: Mutex<Option<AbortHandle>>,
}

impl Debouncer {
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            pending: Mutex::new(None),
        }
    }

    /// Schedule `task`, replacing any call still waiting.
    ///
    /// Without a Tokio runtime the task runs immediately.
    pub fn call<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.take() {
            previous.abort();
        }

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                warn!("No async runtime available, running debounced call immediately");
                drop(pending);
                task();
                return;
            }
        };

        let wait = self.wait;
        let handle = runtime.spawn(async move {
            tokio::time::sleep(wait).await;
            task();
        });
        *pending = Some(handle.abort_handle());
    }

    /// Drop the waiting call, if any
    pub fn cancel(&self) {
        if let Some(previous) = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            previous.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

/// Lets at most one call through per `limit` window; the rest are dropped
#[derive(Debug)]
pub struct Throttle {
    limit: Duration,
    last: Mutex<Option<Instant>>,
}

impl Throttle {
    pub fn new(limit: Duration) -> Self {
        Self {
            limit,
            last: Mutex::new(None),
        }
    }

    /// Run `task` unless a call went through less than `limit` ago
    pub fn call<T>(&self, task: impl FnOnce() -> T) -> Option<T> {
        {
            let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
            let now = Instant::now();
            if last.is_some_and(|previous| now.duration_since(previous) < self.limit) {
                return None;
            }
            *last = Some(now);
        }
        Some(task())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_debounce_runs_only_last_call() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let seen = Arc::new(Mutex::new(Vec::new()));

        for value in 1..=3 {
            let seen = seen.clone();
            debouncer.call(move || seen.lock().unwrap().push(value));
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert!(debouncer.is_pending());
        assert!(seen.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(*seen.lock().unwrap(), vec![3]);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_cancel() {
        let debouncer = Debouncer::new(Duration::from_millis(50));
        let count = Arc::new(AtomicUsize::new(0));

        let counter = count.clone();
        debouncer.call(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        debouncer.cancel();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_debounce_without_runtime_runs_now() {
        let debouncer = Debouncer::new(Duration::from_secs(1));
        let count = Arc::new(AtomicUsize::new(0));

        let counter = count.clone();
        debouncer.call(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_throttle_drops_calls_inside_window() {
        let throttle = Throttle::new(Duration::from_millis(200));

        assert_eq!(throttle.call(|| 1), Some(1));
        assert_eq!(throttle.call(|| 2), None);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(throttle.call(|| 3), None);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(throttle.call(|| 4), Some(4));
        assert_eq!(throttle.call(|| 5), None);
    }
}
