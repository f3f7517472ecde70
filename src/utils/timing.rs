//! Elapsed-time measurement
//!
//! Readings come from Tokio's clock, so they follow paused time in tests.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// A single running measurement
#[derive(Debug, Clone)]
pub struct Stopwatch {
    name: String,
    started: Instant,
}

impl Stopwatch {
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            started: Instant::now(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Stop, log the elapsed time and return it
    pub fn finish(self) -> Duration {
        let elapsed = self.elapsed();
        debug!(
            "{}: {:.2}ms",
            self.name,
            elapsed.as_secs_f64() * 1000.0
        );
        elapsed
    }
}

/// Named measurements that can be started and ended from different places.
///
/// Starting a name that is already running restarts it.
#[derive(Debug, Default)]
pub struct PerformanceMonitor {
    running: Mutex<HashMap<String, Stopwatch>>,
}

impl PerformanceMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self, name: impl Into<String>) {
        let stopwatch = Stopwatch::start(name);
        self.running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(stopwatch.name().to_string(), stopwatch);
    }

    /// End a measurement; `None` if `name` was never started
    pub fn end(&self, name: &str) -> Option<Duration> {
        let stopwatch = self
            .running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)?;
        Some(stopwatch.finish())
    }

    /// Whether `name` is currently being measured
    pub fn is_running(&self, name: &str) -> bool {
        self.running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Time a synchronous operation
    pub fn measure<T>(&self, name: &str, operation: impl FnOnce() -> T) -> T {
        self.start(name);
        let result = operation();
        self.end(name);
        result
    }

    /// Time a future until it completes
    pub async fn measure_async<F: Future>(&self, name: &str, future: F) -> F::Output {
        self.start(name);
        let result = future.await;
        self.end(name);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_stopwatch_follows_tokio_clock() {
        let stopwatch = Stopwatch::start("load");
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(stopwatch.name(), "load");
        assert_eq!(stopwatch.finish(), Duration::from_millis(250));
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_end_pairs() {
        let monitor = PerformanceMonitor::new();
        assert_eq!(monitor.end("render"), None);

        monitor.start("render");
        assert!(monitor.is_running("render"));
        tokio::time::sleep(Duration::from_millis(40)).await;

        assert_eq!(monitor.end("render"), Some(Duration::from_millis(40)));
        assert!(!monitor.is_running("render"));
        assert_eq!(monitor.end("render"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_resets_measurement() {
        let monitor = PerformanceMonitor::new();
        monitor.start("fetch");
        tokio::time::sleep(Duration::from_millis(100)).await;
        monitor.start("fetch");
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(monitor.end("fetch"), Some(Duration::from_millis(10)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_measure_returns_result() {
        let monitor = PerformanceMonitor::new();
        assert_eq!(monitor.measure("sum", || 2 + 3), 5);

        let value = monitor
            .measure_async("wait", async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                "done"
            })
            .await;
        assert_eq!(value, "done");
        assert!(!monitor.is_running("sum"));
        assert!(!monitor.is_running("wait"));
    }
}
