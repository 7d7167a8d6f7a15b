//! Throughput reporting for the read loop
//!
//! When progress display is on, each interval line is printed to stdout above
//! a spinner (or plainly when stdout is not a terminal and the spinner is
//! hidden). The closing line is left to the final report. Quiet runs only log
//! at debug level.

use super::stats::rate;
use indicatif::{HumanCount, ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};
use tracing::debug;

/// Progress reporter for a pipeline run
pub struct ProgressReporter {
    progress_bar: Option<ProgressBar>,
    started: Instant,
    lines_emitted: usize,
}

impl ProgressReporter {
    /// Create a reporter, with a spinner when `show_progress` is set
    pub fn new(show_progress: bool) -> Self {
        let progress_bar = show_progress.then(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.enable_steady_tick(Duration::from_millis(120));
            pb.set_message("Reverse geo-coding");
            pb
        });

        Self {
            progress_bar,
            started: Instant::now(),
            lines_emitted: 0,
        }
    }

    /// A reporter that prints nothing
    pub fn hidden() -> Self {
        Self::new(false)
    }

    /// Restart the clock at the top of the read loop
    pub fn start(&mut self) {
        self.started = Instant::now();
        self.lines_emitted = 0;
        debug!("Progress clock started");
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Emit a progress line for `rows_read` rows and return it
    pub fn report(&mut self, rows_read: u64) -> String {
        let line = self.next_line(rows_read);
        match self.progress_bar {
            Some(ref pb) if pb.is_hidden() => println!("{}", line),
            Some(ref pb) => {
                pb.println(&line);
                pb.set_message(line.clone());
            }
            None => {}
        }
        line
    }

    /// Closing progress line; clears the spinner without printing
    pub fn finish(&mut self, rows_read: u64) -> String {
        let line = self.next_line(rows_read);
        if let Some(ref pb) = self.progress_bar {
            pb.finish_and_clear();
        }
        line
    }

    /// Number of progress lines emitted since `start`
    pub fn lines_emitted(&self) -> usize {
        self.lines_emitted
    }

    fn next_line(&mut self, rows_read: u64) -> String {
        let line = progress_line(rows_read, self.elapsed());
        debug!("{}", line);
        self.lines_emitted += 1;
        line
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::hidden()
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        if let Some(ref pb) = self.progress_bar {
            if !pb.is_finished() {
                pb.finish_and_clear();
            }
        }
    }
}

/// `Processed: 12,000 rows in 3 seconds @ 4,000 records/second`
pub fn progress_line(rows_read: u64, elapsed: Duration) -> String {
    format!(
        "Processed: {} rows in {} seconds @ {} records/second",
        HumanCount(rows_read),
        HumanCount(elapsed.as_secs_f64().round() as u64),
        HumanCount(rate(rows_read, elapsed).round() as u64)
    )
}
