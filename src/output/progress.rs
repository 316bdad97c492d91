//! Transient progress line for long-running operations.
//!
//! Ingestion reports per-page progress; this renders it as a single
//! rewriting status line when stdout is a terminal, and stays silent
//! otherwise so piped output remains clean.

use std::io::{self, IsTerminal, Write};
use std::time::{Duration, Instant};

/// A single status line that rewrites itself in place.
pub struct ProgressLine {
    /// Last rendered width, used to blank out leftovers.
    last_width: usize,
    /// Last update time (for rate limiting).
    last_update: Instant,
    /// Minimum time between repaints.
    update_interval: Duration,
    /// Whether output is enabled at all.
    enabled: bool,
}

impl ProgressLine {
    /// Create a progress line, enabled only when stdout is a terminal.
    pub fn new() -> Self {
        Self {
            last_width: 0,
            last_update: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or_else(Instant::now),
            update_interval: Duration::from_millis(100),
            enabled: io::stdout().is_terminal(),
        }
    }

    /// Create a disabled progress line (no output).
    pub fn disabled() -> Self {
        let mut line = Self::new();
        line.enabled = false;
        line
    }

    /// Repaint the line with a new status message.
    pub fn update(&mut self, message: &str) {
        if !self.enabled {
            return;
        }
        if self.last_update.elapsed() < self.update_interval {
            return;
        }
        self.last_update = Instant::now();

        let padding = self.last_width.saturating_sub(message.len());
        print!("\r{message}{}", " ".repeat(padding));
        let _ = io::stdout().flush();
        self.last_width = message.len();
    }

    /// Blank the line and return the cursor to column zero.
    pub fn finish(&mut self) {
        if !self.enabled || self.last_width == 0 {
            return;
        }
        print!("\r{}\r", " ".repeat(self.last_width));
        let _ = io::stdout().flush();
        self.last_width = 0;
    }
}

impl Default for ProgressLine {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ProgressLine {
    fn drop(&mut self) {
        self.finish();
    }
}
