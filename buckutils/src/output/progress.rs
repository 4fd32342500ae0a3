//! Progress indicators for previews and combines.
//!
//! Drawn on stderr and only when stderr is a terminal.
//!
//! # Examples
//!
//! ```
//! use buckutils::output::progress::{ProgressBar, ProgressStyle};
//!
//! let mut progress = ProgressBar::new(12, ProgressStyle::Bar);
//! progress.set_message("Rendering previews");
//! for _ in 0..12 {
//!     progress.increment();
//! }
//! progress.finish();
//! ```

use std::io::{self, IsTerminal, Write};
use std::time::{Duration, Instant};

/// Style of progress indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStyle {
    /// Classic progress bar: [=====>    ]
    Bar,
    /// Spinner indicator for work of unknown length.
    Spinner,
    /// Simple counter: 4/12
    Counter,
}

/// Progress indicator for long-running operations.
#[derive(Debug)]
pub struct ProgressBar {
    total: usize,
    current: usize,
    style: ProgressStyle,
    message: Option<String>,
    start_time: Instant,
    last_update: Instant,
    update_interval: Duration,
    enabled: bool,
    spinner_frame: usize,
}

impl ProgressBar {
    /// Create a new progress indicator.
    pub fn new(total: usize, style: ProgressStyle) -> Self {
        Self {
            total,
            current: 0,
            style,
            message: None,
            start_time: Instant::now(),
            last_update: Instant::now(),
            update_interval: Duration::from_millis(100),
            enabled: io::stderr().is_terminal(),
            spinner_frame: 0,
        }
    }

    /// Bar for known totals, spinner otherwise.
    pub fn auto(total: usize) -> Self {
        let style = if total > 0 {
            ProgressStyle::Bar
        } else {
            ProgressStyle::Spinner
        };
        Self::new(total, style)
    }

    /// Create a progress indicator that never draws.
    pub fn disabled() -> Self {
        let mut pb = Self::new(0, ProgressStyle::Counter);
        pb.enabled = false;
        pb
    }

    /// Set the message shown next to the indicator.
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    /// Move to a specific value. Redraws at most every 100ms.
    pub fn update(&mut self, current: usize) {
        self.current = current;

        if self.last_update.elapsed() < self.update_interval && current < self.total {
            return;
        }

        self.last_update = Instant::now();
        self.render();
    }

    /// Advance by one.
    pub fn increment(&mut self) {
        self.update(self.current + 1);
    }

    /// Mark as finished and move to a new line.
    pub fn finish(&mut self) {
        self.current = self.total;
        if self.enabled {
            self.render();
            eprintln!();
        }
    }

    /// Current progress as a percentage.
    pub fn percent(&self) -> f64 {
        if self.total > 0 {
            (self.current as f64 / self.total as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Time since the indicator was created.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    fn render(&mut self) {
        if !self.enabled {
            return;
        }

        let line = self.render_line();
        eprint!("\r\x1b[K{line}");
        io::stderr().flush().ok();
    }

    fn render_line(&mut self) -> String {
        let elapsed = format_duration(self.start_time.elapsed());
        let mut parts = Vec::new();

        match self.style {
            ProgressStyle::Bar => {
                if let Some(msg) = &self.message {
                    parts.push(msg.clone());
                }
                parts.push(render_bar(self.current, self.total, 30));
                parts.push(format!("{:.0}%", self.percent()));
                parts.push(format!("{}/{}", self.current, self.total));
            }
            ProgressStyle::Spinner => {
                const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
                parts.push(FRAMES[self.spinner_frame % FRAMES.len()].to_string());
                self.spinner_frame += 1;
                if let Some(msg) = &self.message {
                    parts.push(msg.clone());
                }
            }
            ProgressStyle::Counter => {
                if let Some(msg) = &self.message {
                    parts.push(msg.clone());
                }
                parts.push(format!("{}/{}", self.current, self.total));
            }
        }

        parts.push(elapsed);
        parts.join(" ")
    }
}

fn render_bar(current: usize, total: usize, width: usize) -> String {
    let filled = (width * current.min(total)) / total.max(1);
    let head = if filled > 0 { ">" } else { "" };
    format!(
        "[{}{}{}]",
        "=".repeat(filled.saturating_sub(1)),
        head,
        " ".repeat(width - filled)
    )
}

/// Format a duration as a human-readable string.
fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_style() {
        assert_eq!(ProgressBar::auto(10).style, ProgressStyle::Bar);
        assert_eq!(ProgressBar::auto(0).style, ProgressStyle::Spinner);
    }

    #[test]
    fn test_increment_and_finish() {
        let mut pb = ProgressBar::disabled();
        pb.total = 4;
        pb.increment();
        pb.increment();
        assert_eq!(pb.current, 2);
        assert_eq!(pb.percent(), 50.0);

        pb.finish();
        assert_eq!(pb.current, 4);
    }

    #[test]
    fn test_percent_zero_total() {
        assert_eq!(ProgressBar::disabled().percent(), 0.0);
    }

    #[test]
    fn test_render_bar() {
        assert_eq!(render_bar(0, 4, 4), "[    ]");
        assert_eq!(render_bar(2, 4, 4), "[=>  ]");
        assert_eq!(render_bar(4, 4, 4), "[===>]");
        assert_eq!(render_bar(9, 4, 4), "[===>]");
    }

    #[test]
    fn test_render_line_includes_message() {
        let mut pb = ProgressBar::new(3, ProgressStyle::Counter);
        pb.set_message("Rendering");
        pb.current = 1;
        let line = pb.render_line();
        assert!(line.starts_with("Rendering 1/3"));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(30)), "30s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(format_duration(Duration::from_secs(3661)), "1h 1m");
    }
}
