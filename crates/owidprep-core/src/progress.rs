//! Step progress for TTY and non-TTY runs.
//!
//! TTY mode: an indicatif spinner line per pipeline step.
//! Non-TTY mode: hidden bars; log lines carry the progress instead.

use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Progress display for a pipeline run.
pub struct Progress {
    multi: MultiProgress,
    is_tty: bool,
}

impl Progress {
    /// Create a new display, detecting TTY automatically.
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            is_tty: std::io::stderr().is_terminal(),
        }
    }

    /// Spinner status line for one pipeline step.
    ///
    /// Update with `set_message` as the step progresses and call
    /// `finish_and_clear` when it completes.
    pub fn step(&self, name: &str) -> ProgressBar {
        if !self.is_tty {
            return ProgressBar::hidden();
        }
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} {prefix:<8.cyan.bold} {wide_msg}")
                .expect("invalid template"),
        );
        pb.set_prefix(name.to_string());
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    }

    /// Whether running in TTY mode.
    pub fn is_tty(&self) -> bool {
        self.is_tty
    }

    /// `MultiProgress` handle for the log bridge.
    pub fn multi(&self) -> &MultiProgress {
        &self.multi
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle passed down from the CLI.
pub type SharedProgress = Arc<Progress>;

/// Format a row count with thousand separators.
pub fn fmt_num(n: usize) -> String {
    let digits = n.to_string().into_bytes();
    let mut out = Vec::with_capacity(digits.len() + digits.len() / 3);
    for (i, d) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(b',');
        }
        out.push(*d);
    }
    String::from_utf8(out).expect("ascii digits")
}
