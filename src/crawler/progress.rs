//! Progress reporting across concurrently running page tasks

use std::sync::atomic::{AtomicUsize, Ordering};
use url::Url;

/// Write-only observer of run progress
///
/// Called exactly once per page task, after it finishes, with the fraction
/// of tasks completed so far and a status label.
pub trait ProgressSink {
    fn report(&self, fraction: f64, label: &str);
}

impl<F> ProgressSink for F
where
    F: Fn(f64, &str),
{
    fn report(&self, fraction: f64, label: &str) {
        self(fraction, label)
    }
}

/// Sink that discards every update
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _fraction: f64, _label: &str) {}
}

/// Shared completion counter for one run
pub struct ProgressTracker<'a> {
    completed: AtomicUsize,
    total: usize,
    sink: &'a dyn ProgressSink,
}

impl<'a> ProgressTracker<'a> {
    pub fn new(total: usize, sink: &'a dyn ProgressSink) -> Self {
        Self {
            completed: AtomicUsize::new(0),
            total,
            sink,
        }
    }

    /// Counts one finished task and reports it to the sink
    ///
    /// Returns the number of tasks completed including this one.
    pub fn record(&self, url: &Url, success: bool) -> usize {
        let completed = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
        let fraction = if self.total == 0 {
            1.0
        } else {
            (completed as f64 / self.total as f64).min(1.0)
        };

        let status = if success { "SUCCESS" } else { "ERROR" };
        let label = format!("{}: {}/{} - {}", status, completed, self.total, url);
        self.sink.report(fraction, &label);

        completed
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> usize {
        self.total
    }
}
