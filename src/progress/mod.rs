//! Progress reporting
//!
//! The resolver and the enricher report progress through
//! [`ProgressObserver`], invoked synchronously once per completed item.
//! Presentation is pluggable: the binary uses [`BarProgress`], tests use
//! closures, and [`NoProgress`] discards everything.

mod bar;

pub use bar::BarProgress;

/// Receives monotonic progress updates
pub trait ProgressObserver: Send + Sync {
    /// Called after each completed item
    ///
    /// # Arguments
    ///
    /// * `current` - Number of items completed so far (1-based)
    /// * `total` - Number of items in this stage
    /// * `label` - Short label of the item that just completed
    fn on_progress(&self, current: usize, total: usize, label: &str);
}

/// Observer that ignores all updates
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&self, _current: usize, _total: usize, _label: &str) {}
}

impl<F> ProgressObserver for F
where
    F: Fn(usize, usize, &str) + Send + Sync,
{
    fn on_progress(&self, current: usize, total: usize, label: &str) {
        self(current, total, label)
    }
}
