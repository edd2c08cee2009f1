use indicatif::{ProgressBar, ProgressStyle};

/// Wrapper around an optional progress bar.
///
/// Purely observational: workflows report row completion here and nothing
/// downstream may depend on it.
pub struct Progress {
    bar: Option<ProgressBar>,
}

impl Progress {
    pub fn bar(total: u64, message: &str) -> Self {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::with_template("{msg} {wide_bar} {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_message(message.to_string());
        Self { bar: Some(bar) }
    }

    /// No-op progress for tests and quiet contexts.
    pub fn hidden() -> Self {
        Self { bar: None }
    }

    pub fn inc(&self, delta: u64) {
        if let Some(bar) = &self.bar {
            bar.inc(delta);
        }
    }

    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}
