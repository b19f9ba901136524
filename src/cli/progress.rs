// Terminal rendering of the copy progress callback
use indicatif::{ProgressBar as IndicatifProgressBar, ProgressStyle};

/// Progress bar wrapper around indicatif, subscribed to the copy pipeline's
/// `(completed, total)` observer callback. The library never renders; this is
/// the CLI's sink.
pub struct CopyBar {
    pb: IndicatifProgressBar,
}

impl CopyBar {
    pub fn new(quiet: bool) -> Self {
        let pb = if quiet {
            IndicatifProgressBar::hidden()
        } else {
            IndicatifProgressBar::new(0)
        };
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} | ETA: {eta}")
                .unwrap()
                .progress_chars("█▓▒░ "),
        );
        Self { pb }
    }

    /// Observer entry point. The total is re-announced at the start of every
    /// copy, so one bar serves a whole upgrade run of several steps.
    pub fn update(&self, completed: u64, total: u64) {
        if self.pb.length() != Some(total) {
            self.pb.set_length(total);
            self.pb.set_position(0);
        }
        self.pb.set_position(completed);
    }

    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}
