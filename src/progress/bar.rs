use crate::progress::ProgressObserver;
use indicatif::{ProgressBar, ProgressStyle};

/// Terminal progress bar backed by `indicatif`
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    /// Creates a visible bar with a fixed prefix such as "Sitemaps"
    pub fn new(prefix: &str) -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{prefix:>10.bold} [{bar:40.cyan/blue}] {pos}/{len} {wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        bar.set_prefix(prefix.to_string());
        Self { bar }
    }

    /// Creates a bar that draws nothing, for quiet mode
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Clears the bar from the terminal
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressObserver for BarProgress {
    fn on_progress(&self, current: usize, total: usize, label: &str) {
        self.bar.set_length(total as u64);
        self.bar.set_position(current as u64);
        self.bar.set_message(label.to_string());
    }
}
